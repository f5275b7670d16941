//! Route-planning orchestration and map rendering for EasyTrip.
//!
//! [`RoutePlanner`] drives a submission through validation, geocoding,
//! recommendation, optimisation and persistence, then hands the result to
//! [`MapRenderer`]. UI code observes progress through
//! [`RoutePlanner::subscribe`].
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//!
//! use easytrip_core::test_support::{
//!     StubDirectionsProvider, StubRecommender, StubResolver, sample_points,
//! };
//! use easytrip_core::{
//!     Coordinate, MemoryKeyValueStore, RouteForm, RouteOptimizer, RouteStateStore,
//! };
//! use easytrip_planner::test_support::RecordingLoader;
//! use easytrip_planner::{MapRenderer, PlannerServices, RoutePlanner};
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
//! # runtime.block_on(async {
//! let planner = RoutePlanner::new(PlannerServices {
//!     resolver: Arc::new(StubResolver::default()),
//!     recommender: Arc::new(StubRecommender::with_points(sample_points(2))),
//!     optimizer: RouteOptimizer::new(Arc::new(StubDirectionsProvider::identity())),
//!     store: RouteStateStore::new(Arc::new(MemoryKeyValueStore::default())),
//!     renderer: Arc::new(MapRenderer::new(Arc::new(RecordingLoader::default()))),
//! });
//! let form = RouteForm::new(Coordinate::new(49.80, 24.00), Coordinate::new(49.85, 24.05));
//! let route = planner.submit(form).await.expect("route");
//! assert_eq!(route.len(), 4);
//! assert!(planner.snapshot().has_saved_route());
//! # });
//! ```

#![forbid(unsafe_code)]

mod error;
mod notify;
mod phase;
mod planner;
pub mod render;

#[doc(hidden)]
pub mod test_support;

pub use error::{FailureReport, PlanningError};
pub use notify::{NOTIFICATION_TTL, Notification, NotificationLevel};
pub use phase::PlannerPhase;
pub use planner::{PlannerServices, PlannerSnapshot, RoutePlanner};
pub use render::{MapOptions, MapRenderer, RenderError};
