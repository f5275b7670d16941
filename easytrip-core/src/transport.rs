//! Transport modes chosen by the visitor and the travel modes sent to the
//! routing provider.

use serde::{Deserialize, Serialize};

/// How the visitor intends to move between stops.
///
/// Parsing is total: any unrecognised name falls back to [`Transport::Car`].
///
/// # Examples
/// ```
/// use easytrip_core::{Transport, TravelMode};
///
/// assert_eq!(Transport::from_name("walk"), Transport::Walk);
/// assert_eq!(Transport::from_name("hovercraft"), Transport::Car);
/// assert_eq!(Transport::Bike.travel_mode(), TravelMode::Bicycling);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Transport {
    /// On foot.
    Walk,
    /// By bicycle.
    Bike,
    /// By car; also the fallback for unknown names.
    #[default]
    Car,
}

impl Transport {
    /// Map a transport name onto a mode, defaulting to [`Transport::Car`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "walk" => Self::Walk,
            "bike" => Self::Bike,
            _ => Self::Car,
        }
    }

    /// Return the wire name sent to the recommendation service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Bike => "bike",
            Self::Car => "car",
        }
    }

    /// Travel mode requested from the routing provider.
    #[must_use]
    pub const fn travel_mode(self) -> TravelMode {
        match self {
            Self::Walk => TravelMode::Walking,
            Self::Bike => TravelMode::Bicycling,
            Self::Car => TravelMode::Driving,
        }
    }
}

impl From<&str> for Transport {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

impl From<String> for Transport {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel modality understood by the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    /// Pedestrian routing.
    Walking,
    /// Cycle routing.
    Bicycling,
    /// Road routing.
    Driving,
}

impl TravelMode {
    /// Deterministic mapping from a transport name; unknown names drive.
    #[must_use]
    pub fn for_transport_name(name: &str) -> Self {
        Transport::from_name(name).travel_mode()
    }

    /// Lowercase form used in provider query strings.
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Driving => "driving",
        }
    }
}

impl From<Transport> for TravelMode {
    fn from(value: Transport) -> Self {
        value.travel_mode()
    }
}
