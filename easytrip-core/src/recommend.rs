//! Recommendation of candidate points.

use async_trait::async_trait;
use thiserror::Error;

use crate::{RecommendedPoint, RouteRequest};

/// Errors from [`RecommendationClient::recommend`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendationError {
    /// Transport failure, unexpected status or malformed payload.
    #[error("recommendation service unavailable: {message}")]
    Unavailable {
        /// Human-readable cause.
        message: String,
    },
}

/// Ask an external service for candidate points matching a request.
///
/// An empty list is a valid answer. Implementations return points in the
/// order the service produced them and never retry on their own.
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    /// Fetch recommended points for `request`.
    async fn recommend(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RecommendedPoint>, RecommendationError>;
}
