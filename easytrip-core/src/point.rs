//! Points returned by the recommendation service and their route-ordered
//! counterparts.

use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// A candidate stop selected by the recommendation service.
///
/// The position of a point inside a recommendation response is selection
/// order only; it carries no visiting-order meaning.
///
/// # Examples
/// ```
/// use easytrip_core::{Coordinate, RecommendedPoint};
///
/// let point = RecommendedPoint::new(Coordinate::new(49.84, 24.03), "Opera")
///     .with_description("Lviv National Opera");
/// assert_eq!(point.name, "Opera");
/// assert!(point.description.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedPoint {
    /// Position of the stop.
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RecommendedPoint {
    /// Construct a point without a description.
    pub fn new(coordinate: Coordinate, name: impl Into<String>) -> Self {
        Self {
            coordinate,
            name: name.into(),
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Position of a point within a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The route origin.
    Start,
    /// An intermediate stop.
    Waypoint,
    /// The route destination.
    End,
}

/// A render-ready stop carrying its visiting position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedPoint {
    /// Stop metadata.
    #[serde(flatten)]
    pub point: RecommendedPoint,
    /// Zero-based visiting position.
    pub ordinal: usize,
    /// Role of the stop within the route.
    pub role: Role,
}

impl OrderedPoint {
    /// Tag a point with its ordinal and role.
    #[must_use]
    pub const fn new(point: RecommendedPoint, ordinal: usize, role: Role) -> Self {
        Self {
            point,
            ordinal,
            role,
        }
    }

    /// Position of the stop.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.point.coordinate
    }

    /// Display name of the stop.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.point.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_point_parses_service_shape() {
        let json = r#"{"lat": 49.84, "lng": 24.03, "name": "Opera"}"#;
        let point: RecommendedPoint = serde_json::from_str(json).expect("deserialise");
        assert_eq!(point.coordinate, Coordinate::new(49.84, 24.03));
        assert!(point.description.is_none());
    }

    #[test]
    fn ordered_point_serialises_flat() {
        let point = OrderedPoint::new(
            RecommendedPoint::new(Coordinate::new(1.0, 2.0), "Park").with_description("green"),
            3,
            Role::Waypoint,
        );
        let json = serde_json::to_value(&point).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({
                "lat": 1.0,
                "lng": 2.0,
                "name": "Park",
                "description": "green",
                "ordinal": 3,
                "role": "waypoint"
            })
        );
    }
}
