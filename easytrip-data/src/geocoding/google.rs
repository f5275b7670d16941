//! Google Geocoding API response types.
//!
//! See: <https://developers.google.com/maps/documentation/geocoding/requests-geocoding>

use easytrip_core::{Coordinate, GeocodeError};
use serde::Deserialize;

/// Geocoding response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    /// Status code such as `"OK"` or `"ZERO_RESULTS"`.
    pub status: String,
    /// Matches in relevance order.
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    /// Optional explanation accompanying failure statuses.
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResponse {
    /// Reduce the envelope to the first matching coordinate.
    pub(crate) fn into_coordinate(self, query: &str) -> Result<Coordinate, GeocodeError> {
        match self.status.as_str() {
            "OK" => self
                .results
                .into_iter()
                .next()
                .map(|result| {
                    let LatLng { lat, lng } = result.geometry.location;
                    Coordinate::new(lat, lng)
                })
                .ok_or_else(|| GeocodeError::NotFound {
                    query: query.to_owned(),
                }),
            "ZERO_RESULTS" => Err(GeocodeError::NotFound {
                query: query.to_owned(),
            }),
            status => Err(GeocodeError::Unavailable {
                message: match self.error_message {
                    Some(detail) => format!("status {status}: {detail}"),
                    None => format!("status {status}"),
                },
            }),
        }
    }
}
