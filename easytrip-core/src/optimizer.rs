//! Waypoint ordering and reconciliation with recommendation metadata.
//!
//! The routing provider answers with a permutation of *indices* into the
//! submitted waypoint list. Two recommended points may share a coordinate, so
//! names and descriptions are re-associated strictly by submission index.

use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::{
    ComputedRoute, Coordinate, DirectionsError, DirectionsProvider, DirectionsRequest,
    OrderedPoint, RecommendedPoint, Role, RouteShapeError, Transport,
};

/// Name given to the synthetic origin point.
pub const START_NAME: &str = "Start";
/// Name given to the synthetic destination point.
pub const END_NAME: &str = "End";

/// Ways in which a provider's `waypoint_order` fails to be a permutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderDefect {
    /// The order did not cover every submitted waypoint exactly.
    #[error("expected {expected} entries, found {found}")]
    LengthMismatch {
        /// Number of submitted waypoints.
        expected: usize,
        /// Number of entries returned.
        found: usize,
    },
    /// An entry pointed outside the submitted list.
    #[error("index {value} is outside 0..{waypoints}")]
    OutOfRange {
        /// Offending entry.
        value: i64,
        /// Number of submitted waypoints.
        waypoints: usize,
    },
    /// An index appeared more than once.
    #[error("index {index} appears more than once")]
    Repeated {
        /// Repeated index.
        index: usize,
    },
}

/// Why a provider answer could not become a [`ComputedRoute`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderRejection {
    /// The provider call itself failed.
    #[error(transparent)]
    Provider(#[from] DirectionsError),
    /// The returned visiting order was not a permutation.
    #[error("invalid waypoint order: {0}")]
    InvalidOrder(#[from] OrderDefect),
    /// The reconciled points broke the route invariants.
    #[error("invalid route: {0}")]
    InvalidRoute(#[from] RouteShapeError),
}

/// Errors from [`RouteOptimizer::compute_route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteComputationError {
    /// There were no intermediate stops; the provider was not called.
    #[error("no points to route")]
    NoPointsToRoute,
    /// The provider failed or returned an unusable answer.
    #[error("route provider rejected the request: {reason}")]
    ProviderRejected {
        /// Underlying cause.
        reason: ProviderRejection,
    },
}

impl From<ProviderRejection> for RouteComputationError {
    fn from(reason: ProviderRejection) -> Self {
        Self::ProviderRejected { reason }
    }
}

/// Check that `order` is a permutation of `0..waypoints`.
///
/// # Errors
/// Returns the first [`OrderDefect`] found.
pub fn validate_order(order: &[i64], waypoints: usize) -> Result<Vec<usize>, OrderDefect> {
    if order.len() != waypoints {
        return Err(OrderDefect::LengthMismatch {
            expected: waypoints,
            found: order.len(),
        });
    }
    let mut seen = vec![false; waypoints];
    order
        .iter()
        .map(|&value| {
            let index = usize::try_from(value)
                .ok()
                .filter(|index| *index < waypoints)
                .ok_or(OrderDefect::OutOfRange { value, waypoints })?;
            match seen.get_mut(index) {
                Some(slot) if !*slot => {
                    *slot = true;
                    Ok(index)
                }
                _ => Err(OrderDefect::Repeated { index }),
            }
        })
        .collect()
}

/// Rebuild the canonical ordered point sequence from a provider permutation.
///
/// The result starts with a synthetic `Start` point at ordinal zero, lists
/// `points` in the visiting order given by `order`, and ends with a synthetic
/// `End` point at ordinal `points.len() + 1`.
///
/// # Errors
/// Returns [`ProviderRejection::InvalidOrder`] when `order` is not a
/// permutation of `0..points.len()`.
///
/// # Examples
/// ```
/// use easytrip_core::{reconcile, Coordinate, RecommendedPoint, Role};
///
/// let points = vec![
///     RecommendedPoint::new(Coordinate::new(1.0, 1.0), "a"),
///     RecommendedPoint::new(Coordinate::new(2.0, 2.0), "b"),
/// ];
/// let ordered = reconcile(Coordinate::new(0.0, 0.0), Coordinate::new(3.0, 3.0), &points, &[1, 0])?;
/// let names: Vec<_> = ordered.iter().map(|p| p.name()).collect();
/// assert_eq!(names, ["Start", "b", "a", "End"]);
/// assert_eq!(ordered[0].role, Role::Start);
/// # Ok::<(), easytrip_core::ProviderRejection>(())
/// ```
pub fn reconcile(
    origin: Coordinate,
    destination: Coordinate,
    points: &[RecommendedPoint],
    order: &[i64],
) -> Result<Vec<OrderedPoint>, ProviderRejection> {
    let indices = validate_order(order, points.len())?;
    let mut ordered = Vec::with_capacity(points.len() + 2);
    ordered.push(OrderedPoint::new(
        RecommendedPoint::new(origin, START_NAME),
        0,
        Role::Start,
    ));
    for (position, (index, &value)) in indices.into_iter().zip(order).enumerate() {
        let point = points.get(index).cloned().ok_or(OrderDefect::OutOfRange {
            value,
            waypoints: points.len(),
        })?;
        ordered.push(OrderedPoint::new(point, position + 1, Role::Waypoint));
    }
    ordered.push(OrderedPoint::new(
        RecommendedPoint::new(destination, END_NAME),
        points.len() + 1,
        Role::End,
    ));
    Ok(ordered)
}

/// Turns recommended points into an optimally ordered [`ComputedRoute`].
#[derive(Clone)]
pub struct RouteOptimizer {
    provider: Arc<dyn DirectionsProvider>,
}

impl std::fmt::Debug for RouteOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteOptimizer").finish_non_exhaustive()
    }
}

impl RouteOptimizer {
    /// Wrap a directions provider.
    pub fn new(provider: Arc<dyn DirectionsProvider>) -> Self {
        Self { provider }
    }

    /// Ask the provider for an optimised route and reconcile its answer.
    ///
    /// # Errors
    /// Returns [`RouteComputationError::NoPointsToRoute`] without contacting
    /// the provider when `points` is empty, and
    /// [`RouteComputationError::ProviderRejected`] when the provider fails or
    /// returns an order that is not a permutation of the submitted stops.
    pub async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        points: &[RecommendedPoint],
        transport: Transport,
    ) -> Result<ComputedRoute, RouteComputationError> {
        if points.is_empty() {
            return Err(RouteComputationError::NoPointsToRoute);
        }
        let request = DirectionsRequest::new(
            origin,
            destination,
            points.iter().map(|p| p.coordinate).collect(),
            transport.travel_mode(),
        );
        debug!(
            "requesting {} route through {} waypoints",
            request.travel_mode.as_query_value(),
            points.len()
        );
        let response = self
            .provider
            .directions(&request)
            .await
            .map_err(ProviderRejection::from)?;
        let ordered = reconcile(origin, destination, points, &response.waypoint_order)?;
        ComputedRoute::new(ordered, response.path)
            .map_err(|err| ProviderRejection::InvalidRoute(err).into())
    }
}
