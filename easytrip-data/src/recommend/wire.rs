//! Recommendation service response body.

use easytrip_core::RecommendedPoint;
use serde::Deserialize;

/// Response body `{"recommended": [...]}`.
///
/// A missing or `null` list means the service found nothing to recommend.
#[derive(Debug, Deserialize)]
pub(crate) struct RecommendResponse {
    #[serde(default)]
    recommended: Option<Vec<RecommendedPoint>>,
}

impl RecommendResponse {
    pub(crate) fn into_points(self) -> Vec<RecommendedPoint> {
        self.recommended.unwrap_or_default()
    }
}
