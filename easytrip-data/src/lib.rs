//! Adapters connecting EasyTrip to the outside world.
//!
//! Responsibilities:
//! - Implement the service traits from `easytrip-core` over HTTP.
//! - Provide durable key-value stores for the route state slot.
//! - Encapsulate provider wire formats.
//!
//! Boundaries:
//! - Do not encode planning rules (live in `easytrip-core` and
//!   `easytrip-planner`).
//! - Never log or echo API keys.
//!
//! Invariants:
//! - Every adapter is `Send + Sync` and holds no global mutable state.
//! - Adapters never retry on their own.

pub mod directions;
pub mod geocoding;
mod http;
pub mod recommend;
pub mod store;

pub use directions::{DirectionsConfig, HttpDirectionsProvider};
pub use geocoding::{GeocoderConfig, HttpGeocoder};
pub use http::{DEFAULT_USER_AGENT, ProviderBuildError};
pub use recommend::{HttpRecommendationClient, RecommenderConfig};
pub use store::{FileKeyValueStore, FileStoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteKeyValueStore, SqliteStoreError};
