//! The canonical ordered route shared by persistence and rendering.
//!
//! A [`ComputedRoute`] can only be built through a validating constructor, so
//! every value in circulation satisfies the ordering invariants: one start at
//! ordinal zero, one end at the last ordinal, contiguous ordinals, and only
//! waypoints in between.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{OrderedPoint, Role};

/// Provider-specific path payload, kept opaque.
///
/// A `null` payload means no path is available for drawing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPath(serde_json::Value);

impl RawPath {
    /// Wrap a provider payload.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }

    /// Borrow the underlying document.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Violations of the ordered-route invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteShapeError {
    /// No points were supplied.
    #[error("route must contain at least a start and an end")]
    Empty,
    /// A point's ordinal did not match its position.
    #[error("point at position {position} has ordinal {ordinal}")]
    OrdinalMismatch {
        /// Index within the sequence.
        position: usize,
        /// Ordinal carried by the point.
        ordinal: usize,
    },
    /// The first point was not the start.
    #[error("first point must have the start role")]
    StartNotFirst,
    /// The last point was not the end.
    #[error("last point must have the end role")]
    EndNotLast,
    /// A point between start and end was not a waypoint.
    #[error("point {ordinal} between start and end has role {role:?}")]
    UnexpectedRole {
        /// Ordinal of the offending point.
        ordinal: usize,
        /// Role found at that ordinal.
        role: Role,
    },
}

/// A validated, ordered route together with the provider's path payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedRoute {
    points: Vec<OrderedPoint>,
    raw_path: RawPath,
    computed_at: SystemTime,
}

impl ComputedRoute {
    /// Validate `points` and stamp the route with the current time.
    ///
    /// # Errors
    /// Returns [`RouteShapeError`] when the points violate the ordering
    /// invariants.
    pub fn new(points: Vec<OrderedPoint>, raw_path: RawPath) -> Result<Self, RouteShapeError> {
        Self::with_timestamp(points, raw_path, SystemTime::now())
    }

    /// Validate `points` and keep an explicit timestamp.
    ///
    /// # Errors
    /// Returns [`RouteShapeError`] when the points violate the ordering
    /// invariants.
    pub fn with_timestamp(
        points: Vec<OrderedPoint>,
        raw_path: RawPath,
        computed_at: SystemTime,
    ) -> Result<Self, RouteShapeError> {
        validate_shape(&points)?;
        Ok(Self {
            points,
            raw_path,
            computed_at,
        })
    }

    /// Points in visiting order.
    #[must_use]
    pub fn points(&self) -> &[OrderedPoint] {
        &self.points
    }

    /// Intermediate stops in visiting order.
    #[must_use]
    pub fn waypoints(&self) -> &[OrderedPoint] {
        match self.points.split_first().and_then(|(_, rest)| rest.split_last()) {
            Some((_, middle)) => middle,
            None => &[],
        }
    }

    /// Look up a point by ordinal.
    #[must_use]
    pub fn point(&self, ordinal: usize) -> Option<&OrderedPoint> {
        self.points.get(ordinal)
    }

    /// Number of points including start and end.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a valid route has at least two points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Provider path payload.
    #[must_use]
    pub const fn raw_path(&self) -> &RawPath {
        &self.raw_path
    }

    /// When the route was computed or restored.
    #[must_use]
    pub const fn computed_at(&self) -> SystemTime {
        self.computed_at
    }
}

fn validate_shape(points: &[OrderedPoint]) -> Result<(), RouteShapeError> {
    let (first, rest) = points.split_first().ok_or(RouteShapeError::Empty)?;
    if first.role != Role::Start {
        return Err(RouteShapeError::StartNotFirst);
    }
    let (last, middle) = rest.split_last().ok_or(RouteShapeError::EndNotLast)?;
    if last.role != Role::End {
        return Err(RouteShapeError::EndNotLast);
    }
    for (position, point) in points.iter().enumerate() {
        if point.ordinal != position {
            return Err(RouteShapeError::OrdinalMismatch {
                position,
                ordinal: point.ordinal,
            });
        }
    }
    if let Some(stray) = middle.iter().find(|p| p.role != Role::Waypoint) {
        return Err(RouteShapeError::UnexpectedRole {
            ordinal: stray.ordinal,
            role: stray.role,
        });
    }
    Ok(())
}
