//! Geographic positions exchanged with every external service.

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// A WGS84 position expressed in degrees.
///
/// Coordinates are plain values: once produced by a geocoder, a form or a
/// recommendation they are copied, never mutated in place.
///
/// # Examples
/// ```
/// use easytrip_core::Coordinate;
///
/// let lviv = Coordinate::new(49.8397, 24.0297);
/// assert_eq!(lviv.lat(), 49.8397);
/// assert_eq!(lviv.to_query_value(), "49.8397,24.0297");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Render as the `lat,lng` pair used by Google-style query strings.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

// geo follows the x = longitude, y = latitude convention.
impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.lng,
            y: value.lat,
        }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Self::new(value.y, value.x)
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        Self::from(Coord::from(value))
    }
}
