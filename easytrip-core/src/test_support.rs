//! Deterministic in-memory service doubles used by unit and behaviour tests.
//!
//! None of these types perform I/O. Each records how often it was called so
//! tests can assert that a stage was skipped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{
    AddressResolver, BackendError, ComputedRoute, Coordinate, DirectionsError,
    DirectionsProvider, DirectionsRequest, DirectionsResponse, GeocodeError, KeyValueStore,
    ProviderRejection, RawPath, RecommendationClient, RecommendationError, RecommendedPoint,
    RouteRequest, reconcile,
};

/// Build `count` distinct points named `poi-0`, `poi-1`, …
#[must_use]
pub fn sample_points(count: usize) -> Vec<RecommendedPoint> {
    (0..count)
        .map(|i| {
            let offset = f64::from(u32::try_from(i).unwrap_or(u32::MAX)) * 0.001;
            RecommendedPoint::new(
                Coordinate::new(49.84 + offset, 24.03 + offset),
                format!("poi-{i}"),
            )
        })
        .collect()
}

/// Build a valid route through `count` sample points in submission order.
///
/// # Panics
/// Never; the identity order is always a valid permutation.
#[must_use]
pub fn sample_route(count: usize) -> ComputedRoute {
    let points = sample_points(count);
    let order: Vec<i64> = (0..count)
        .map(|i| i64::try_from(i).unwrap_or(i64::MAX))
        .collect();
    reconcile(
        Coordinate::new(49.80, 24.00),
        Coordinate::new(49.85, 24.05),
        &points,
        &order,
    )
    .and_then(|ordered| {
        ComputedRoute::new(ordered, RawPath::new(serde_json::json!({ "status": "OK" })))
            .map_err(ProviderRejection::from)
    })
    .unwrap_or_else(|err| panic!("sample route is always valid: {err}"))
}

/// Resolver answering from a fixed address table.
///
/// Unknown addresses yield [`GeocodeError::NotFound`].
#[derive(Debug, Default)]
pub struct StubResolver {
    answers: HashMap<String, Result<Coordinate, GeocodeError>>,
    calls: AtomicUsize,
}

impl StubResolver {
    /// Register a successful answer.
    #[must_use]
    pub fn with(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.answers.insert(address.to_owned(), Ok(coordinate));
        self
    }

    /// Register a failure.
    #[must_use]
    pub fn with_error(mut self, address: &str, error: GeocodeError) -> Self {
        self.answers.insert(address.to_owned(), Err(error));
        self
    }

    /// Number of `resolve` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressResolver for StubResolver {
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyInput);
        }
        self.answers
            .get(address)
            .cloned()
            .unwrap_or_else(|| {
                Err(GeocodeError::NotFound {
                    query: address.to_owned(),
                })
            })
    }
}

/// Recommender returning a fixed answer and recording requests.
#[derive(Debug)]
pub struct StubRecommender {
    answer: Result<Vec<RecommendedPoint>, RecommendationError>,
    requests: Mutex<Vec<RouteRequest>>,
}

impl StubRecommender {
    /// Always recommend `points`.
    #[must_use]
    pub fn with_points(points: Vec<RecommendedPoint>) -> Self {
        Self {
            answer: Ok(points),
            requests: Mutex::default(),
        }
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn failing(error: RecommendationError) -> Self {
        Self {
            answer: Err(error),
            requests: Mutex::default(),
        }
    }

    /// Number of `recommend` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<RouteRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl RecommendationClient for StubRecommender {
    async fn recommend(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RecommendedPoint>, RecommendationError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.answer.clone()
    }
}

#[derive(Debug, Clone)]
enum DirectionsAnswer {
    Identity,
    Order(Vec<i64>),
    Error(DirectionsError),
}

/// Directions provider with a scripted visiting order.
#[derive(Debug)]
pub struct StubDirectionsProvider {
    answer: DirectionsAnswer,
    requests: Mutex<Vec<DirectionsRequest>>,
}

impl StubDirectionsProvider {
    fn build(answer: DirectionsAnswer) -> Self {
        Self {
            answer,
            requests: Mutex::default(),
        }
    }

    /// Visit waypoints in submission order.
    #[must_use]
    pub fn identity() -> Self {
        Self::build(DirectionsAnswer::Identity)
    }

    /// Return `order` regardless of the request.
    #[must_use]
    pub fn with_order(order: Vec<i64>) -> Self {
        Self::build(DirectionsAnswer::Order(order))
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn failing(error: DirectionsError) -> Self {
        Self::build(DirectionsAnswer::Error(error))
    }

    /// Number of `directions` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<DirectionsRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl DirectionsProvider for StubDirectionsProvider {
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let waypoint_order = match &self.answer {
            DirectionsAnswer::Identity => (0..request.waypoints.len())
                .map(|i| i64::try_from(i).unwrap_or(i64::MAX))
                .collect(),
            DirectionsAnswer::Order(order) => order.clone(),
            DirectionsAnswer::Error(err) => return Err(err.clone()),
        };
        Ok(DirectionsResponse {
            path: RawPath::new(serde_json::json!({
                "status": "OK",
                "routes": [{ "waypoint_order": waypoint_order }],
            })),
            waypoint_order,
        })
    }
}

/// Key-value store whose every operation fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingKeyValueStore;

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, _key: &str) -> Result<Option<String>, BackendError> {
        Err("storage unavailable".into())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), BackendError> {
        Err("quota exceeded".into())
    }

    fn remove(&self, _key: &str) -> Result<(), BackendError> {
        Err("storage unavailable".into())
    }
}
