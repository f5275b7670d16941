//! Facade crate for the EasyTrip route planner.
//!
//! Re-exports the domain model and the planner. The HTTP service adapters
//! and durable stores are available behind the `http` and `store-sqlite`
//! features.

#![forbid(unsafe_code)]

pub use easytrip_core::{
    AddressResolver, Category, ComputedRoute, Coordinate, DEFAULT_STORAGE_KEY, Endpoint,
    GeocodeError, InputError, KeyValueStore, LocationInput, MemoryKeyValueStore, OrderedPoint,
    Preferences, PreferenceSliders, RecommendationClient, RecommendationError, RecommendedPoint,
    Role, RouteComputationError, RouteForm, RouteOptimizer, RouteRequest, RouteStateStore,
    StorageError, Transport,
};
pub use easytrip_planner::{
    FailureReport, MapOptions, MapRenderer, Notification, NotificationLevel, PlannerPhase,
    PlannerServices, PlannerSnapshot, PlanningError, RenderError, RoutePlanner,
};
pub use easytrip_planner::render::{MapSurface, MapView, MarkerSpec, SurfaceLoader};

#[cfg(feature = "http")]
pub use easytrip_data::{
    DirectionsConfig, FileKeyValueStore, GeocoderConfig, HttpDirectionsProvider, HttpGeocoder,
    HttpRecommendationClient, ProviderBuildError, RecommenderConfig,
};

#[cfg(feature = "store-sqlite")]
pub use easytrip_data::{SqliteKeyValueStore, SqliteStoreError};
