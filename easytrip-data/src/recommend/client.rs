//! HTTP [`RecommendationClient`].

use std::time::Duration;

use async_trait::async_trait;
use easytrip_core::{RecommendationClient, RecommendationError, RecommendedPoint, RouteRequest};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::wire::RecommendResponse;
use crate::http::{
    ProviderBuildError, build_client, default_timeout, default_user_agent, describe_reqwest_error,
    duration_secs, parse_base_url,
};

/// Default recommendation service origin.
pub const DEFAULT_RECOMMENDER_URL: &str = "http://localhost:8000";

/// Default path of the recommendation endpoint.
pub const DEFAULT_RECOMMEND_PATH: &str = "/ml/recommend";

/// Configuration for [`HttpRecommendationClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Service origin.
    pub base_url: String,
    /// Path of the endpoint beneath `base_url`.
    pub endpoint_path: String,
    /// Request timeout.
    #[serde(with = "duration_secs", rename = "timeout_secs")]
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RECOMMENDER_URL.to_owned(),
            endpoint_path: DEFAULT_RECOMMEND_PATH.to_owned(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl RecommenderConfig {
    /// Create a configuration for the given origin.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the endpoint path.
    #[must_use]
    pub fn with_endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = path.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Recommendation client issuing one `POST` per request.
#[derive(Debug)]
pub struct HttpRecommendationClient {
    client: Client,
    endpoint: Url,
    config: RecommenderConfig,
}

impl HttpRecommendationClient {
    /// Create a client for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(RecommenderConfig::new(base_url))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client fails to build.
    pub fn with_config(config: RecommenderConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = endpoint_url(&config.base_url, &config.endpoint_path)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Fully resolved endpoint URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn unavailable(&self, error: reqwest::Error) -> RecommendationError {
        RecommendationError::Unavailable {
            message: describe_reqwest_error(error, self.config.timeout),
        }
    }
}

fn endpoint_url(base_url: &str, path: &str) -> Result<Url, ProviderBuildError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    parse_base_url(&joined)
}

#[async_trait]
impl RecommendationClient for HttpRecommendationClient {
    async fn recommend(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RecommendedPoint>, RecommendationError> {
        debug!(
            "requesting recommendations from {} for {} minutes by {}",
            self.endpoint,
            request.free_time_minutes(),
            request.transport()
        );
        let response: RecommendResponse = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.unavailable(err))?
            .json()
            .await
            .map_err(|err| self.unavailable(err))?;
        Ok(response.into_points())
    }
}
