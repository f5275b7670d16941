//! Google Directions API response handling.
//!
//! See: <https://developers.google.com/maps/documentation/directions/get-directions>

use easytrip_core::{DirectionsError, DirectionsResponse, RawPath};
use serde::Deserialize;
use serde_json::Value;

/// The parts of a directions response the optimiser needs.
#[derive(Debug, Deserialize)]
struct DirectionsEnvelope {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    #[serde(default)]
    waypoint_order: Vec<i64>,
}

/// Split a raw response document into visiting order and opaque path.
pub(crate) fn convert_response(document: Value) -> Result<DirectionsResponse, DirectionsError> {
    let envelope =
        DirectionsEnvelope::deserialize(&document).map_err(|err| DirectionsError::Unavailable {
            message: format!("malformed directions response: {err}"),
        })?;
    if envelope.status != "OK" {
        return Err(DirectionsError::Status {
            status: envelope.status,
            message: envelope.error_message.unwrap_or_default(),
        });
    }
    let route = envelope
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::MissingRoute)?;
    Ok(DirectionsResponse {
        path: RawPath::new(document),
        waypoint_order: route.waypoint_order,
    })
}
