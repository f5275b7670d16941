//! Planning failures and their user-facing messages.

use easytrip_core::{
    Endpoint, GeocodeError, InputError, RecommendationError, RouteComputationError, StorageError,
};
use thiserror::Error;

use crate::{PlannerPhase, RenderError};

/// Why a planning or restore flow stopped.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The form failed validation.
    #[error(transparent)]
    Input(#[from] InputError),
    /// An endpoint could not be geocoded.
    #[error("could not resolve the {endpoint} address: {source}")]
    Geocode {
        /// Which endpoint failed.
        endpoint: Endpoint,
        /// Underlying failure.
        #[source]
        source: GeocodeError,
    },
    /// The recommendation service failed.
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    /// The recommendation service returned no points.
    #[error("no points of interest matched the request")]
    InsufficientPoints,
    /// The routing provider rejected the request.
    #[error("route computation failed: {0}")]
    RouteComputation(#[source] RouteComputationError),
    /// The map surface could not be prepared.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The saved route could not be read.
    #[error(transparent)]
    Restore(StorageError),
    /// A newer flow replaced this one before it finished.
    #[error("superseded by a newer request")]
    Superseded,
}

impl From<RouteComputationError> for PlanningError {
    fn from(err: RouteComputationError) -> Self {
        match err {
            RouteComputationError::NoPointsToRoute => Self::InsufficientPoints,
            other => Self::RouteComputation(other),
        }
    }
}

impl PlanningError {
    /// Stage in which the failure occurred.
    #[must_use]
    pub const fn phase(&self) -> PlannerPhase {
        match self {
            Self::Input(_) => PlannerPhase::Validating,
            Self::Geocode { .. } => PlannerPhase::Geocoding,
            Self::Recommendation(_) | Self::InsufficientPoints => PlannerPhase::Recommending,
            Self::RouteComputation(_) => PlannerPhase::Optimizing,
            Self::Render(_) => PlannerPhase::Persisting,
            Self::Restore(_) => PlannerPhase::Restoring,
            Self::Superseded => PlannerPhase::Idle,
        }
    }

    /// Short message suitable for a toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Input(InputError::BlankAddress { endpoint }) => {
                format!("Please enter the {endpoint} address")
            }
            Self::Input(err) => capitalise(&err.to_string()),
            Self::Geocode {
                endpoint,
                source: GeocodeError::NotFound { .. } | GeocodeError::EmptyInput,
            } => format!("Could not find the {endpoint} address"),
            Self::Geocode { .. } => "Address lookup is unavailable, try again later".to_owned(),
            Self::Recommendation(_) => {
                "Recommendations are unavailable, try again later".to_owned()
            }
            Self::InsufficientPoints => {
                "No places match your preferences, try adjusting them".to_owned()
            }
            Self::RouteComputation(_) => "Could not build a route".to_owned(),
            Self::Render(_) => "The map could not be loaded".to_owned(),
            Self::Restore(_) => "The saved route could not be read".to_owned(),
            Self::Superseded => "Request replaced by a newer one".to_owned(),
        }
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Summary of the most recent failure kept in the planner snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Stage that failed.
    pub phase: PlannerPhase,
    /// User-facing message.
    pub message: String,
    /// Diagnostic detail from the error chain.
    pub detail: String,
}

impl From<&PlanningError> for FailureReport {
    fn from(err: &PlanningError) -> Self {
        Self {
            phase: err.phase(),
            message: err.user_message(),
            detail: err.to_string(),
        }
    }
}
