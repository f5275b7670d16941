//! The immutable request sent to the recommendation service.

use std::num::NonZeroU32;

use serde::Serialize;

use crate::{Coordinate, Preferences, Transport};

/// A fully resolved planning request.
///
/// Built once per submission from a validated form and the two resolved
/// endpoints; it is never mutated afterwards. Serialises to the body expected
/// by the recommendation service.
///
/// # Examples
/// ```
/// use std::num::NonZeroU32;
/// use easytrip_core::{Coordinate, Preferences, RouteRequest, Transport};
///
/// let request = RouteRequest::new(
///     Coordinate::new(49.82, 24.00),
///     Coordinate::new(49.84, 24.03),
///     Preferences::uniform(0.5),
///     Transport::Walk,
///     NonZeroU32::MIN,
/// );
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["transport"], "walk");
/// assert_eq!(body["free_time_minutes"], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    #[serde(rename = "start_location")]
    start: Coordinate,
    #[serde(rename = "end_location")]
    end: Coordinate,
    preferences: Preferences,
    transport: Transport,
    free_time_minutes: NonZeroU32,
}

impl RouteRequest {
    /// Assemble a request.
    #[must_use]
    pub const fn new(
        start: Coordinate,
        end: Coordinate,
        preferences: Preferences,
        transport: Transport,
        free_time_minutes: NonZeroU32,
    ) -> Self {
        Self {
            start,
            end,
            preferences,
            transport,
            free_time_minutes,
        }
    }

    /// Route origin.
    #[must_use]
    pub const fn start(&self) -> Coordinate {
        self.start
    }

    /// Route destination.
    #[must_use]
    pub const fn end(&self) -> Coordinate {
        self.end
    }

    /// Normalised category weights.
    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Requested transport mode.
    #[must_use]
    pub const fn transport(&self) -> Transport {
        self.transport
    }

    /// Free-time budget in minutes.
    #[must_use]
    pub const fn free_time_minutes(&self) -> NonZeroU32 {
        self.free_time_minutes
    }
}
