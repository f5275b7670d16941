//! Directions provider contract used by the route optimiser.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Coordinate, RawPath, TravelMode};

/// Errors from [`DirectionsProvider::directions`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionsError {
    /// Transport failure or malformed response.
    #[error("directions service unavailable: {message}")]
    Unavailable {
        /// Human-readable cause.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("directions service returned status {status}: {message}")]
    Status {
        /// Provider status code, such as `ZERO_RESULTS`.
        status: String,
        /// Provider message, possibly empty.
        message: String,
    },
    /// A success status without any route.
    #[error("directions response contained no route")]
    MissingRoute,
}

/// Request for an optimised multi-stop route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsRequest {
    /// Fixed origin.
    pub origin: Coordinate,
    /// Fixed destination.
    pub destination: Coordinate,
    /// Intermediate stops the provider may reorder.
    pub waypoints: Vec<Coordinate>,
    /// Ask the provider to reorder waypoints.
    pub optimize_waypoints: bool,
    /// Travel mode.
    pub travel_mode: TravelMode,
}

impl DirectionsRequest {
    /// Build an optimising request.
    #[must_use]
    pub const fn new(
        origin: Coordinate,
        destination: Coordinate,
        waypoints: Vec<Coordinate>,
        travel_mode: TravelMode,
    ) -> Self {
        Self {
            origin,
            destination,
            waypoints,
            optimize_waypoints: true,
            travel_mode,
        }
    }
}

/// Provider answer: an opaque path plus the permutation it chose.
///
/// `waypoint_order[i]` is the index into the submitted waypoints of the stop
/// visited in position `i`. Values are kept signed so that malformed provider
/// output can be detected rather than silently wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsResponse {
    /// Opaque drawable path.
    pub path: RawPath,
    /// Visiting order of the submitted waypoints.
    pub waypoint_order: Vec<i64>,
}

/// Compute an optimised route between fixed endpoints.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Fetch directions for `request`.
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError>;
}
