//! Core domain model and service contracts for EasyTrip route planning.
//!
//! The crate defines the values exchanged between the planner and its
//! collaborators (coordinates, preferences, requests, recommended and ordered
//! points, computed routes), the traits external services implement, and the
//! two pieces of logic that need no I/O of their own: reconciling a routing
//! provider's visiting order with recommendation metadata, and persisting the
//! last route through an injected key-value store.
//!
//! # Examples
//! ```
//! use easytrip_core::{Coordinate, RecommendedPoint, reconcile};
//!
//! let points = vec![
//!     RecommendedPoint::new(Coordinate::new(49.841, 24.031), "Opera"),
//!     RecommendedPoint::new(Coordinate::new(49.842, 24.032), "Rynok Square"),
//! ];
//! let ordered = reconcile(
//!     Coordinate::new(49.80, 24.00),
//!     Coordinate::new(49.85, 24.05),
//!     &points,
//!     &[1, 0],
//! )?;
//! assert_eq!(ordered.len(), 4);
//! # Ok::<(), easytrip_core::ProviderRejection>(())
//! ```

#![forbid(unsafe_code)]

mod category;
mod coordinate;
mod directions;
mod form;
mod geocode;
mod optimizer;
mod point;
mod recommend;
mod request;
mod route;
mod store;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use category::{Category, Preferences, PreferencesError};
pub use coordinate::Coordinate;
pub use directions::{DirectionsError, DirectionsProvider, DirectionsRequest, DirectionsResponse};
pub use form::{
    DEFAULT_FREE_TIME_MINUTES, Endpoint, FREE_TIME_STEP_MINUTES, InputError, LocationInput,
    MAX_FREE_TIME_MINUTES, MIN_FREE_TIME_MINUTES, PreferenceSliders, RouteForm, SLIDER_MAX,
    ValidatedForm,
};
pub use geocode::{AddressResolver, GeocodeError};
pub use optimizer::{
    END_NAME, OrderDefect, ProviderRejection, RouteComputationError, RouteOptimizer, START_NAME,
    reconcile, validate_order,
};
pub use point::{OrderedPoint, RecommendedPoint, Role};
pub use recommend::{RecommendationClient, RecommendationError};
pub use request::RouteRequest;
pub use route::{ComputedRoute, RawPath, RouteShapeError};
pub use store::{
    BackendError, DEFAULT_STORAGE_KEY, KeyValueStore, MemoryKeyValueStore, RouteStateStore,
    StorageError,
};
pub use transport::{Transport, TravelMode};
