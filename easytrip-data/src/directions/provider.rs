//! HTTP [`DirectionsProvider`] backed by a Google-style directions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use easytrip_core::{
    Coordinate, DirectionsError, DirectionsProvider, DirectionsRequest, DirectionsResponse,
};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::google::convert_response;
use crate::http::{
    ProviderBuildError, build_client, default_timeout, default_user_agent, describe_reqwest_error,
    duration_secs, parse_base_url,
};

/// Default directions endpoint.
pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Configuration for [`HttpDirectionsProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    /// Endpoint URL.
    pub base_url: String,
    /// API key sent as the `key` query parameter, if any.
    pub api_key: Option<String>,
    /// Request timeout.
    #[serde(with = "duration_secs", rename = "timeout_secs")]
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTIONS_URL.to_owned(),
            api_key: None,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl DirectionsConfig {
    /// Create a configuration for the given endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
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

/// Directions provider issuing one `GET` per route.
pub struct HttpDirectionsProvider {
    client: Client,
    base_url: Url,
    config: DirectionsConfig,
}

impl std::fmt::Debug for HttpDirectionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDirectionsProvider")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpDirectionsProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(DirectionsConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client fails to build.
    pub fn with_config(config: DirectionsConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Build the query URL.
    ///
    /// Waypoints are sent as `optimize:true|lat,lng|lat,lng` when the request
    /// asks for reordering.
    fn build_url(&self, request: &DirectionsRequest) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("origin", &request.origin.to_query_value());
            query.append_pair("destination", &request.destination.to_query_value());
            if !request.waypoints.is_empty() {
                let prefix = request
                    .optimize_waypoints
                    .then(|| "optimize:true".to_owned());
                let stops = request.waypoints.iter().map(Coordinate::to_query_value);
                let waypoints: Vec<String> = prefix.into_iter().chain(stops).collect();
                query.append_pair("waypoints", &waypoints.join("|"));
            }
            query.append_pair("mode", request.travel_mode.as_query_value());
            if let Some(key) = &self.config.api_key {
                query.append_pair("key", key);
            }
        }
        url
    }

    fn unavailable(&self, error: reqwest::Error) -> DirectionsError {
        DirectionsError::Unavailable {
            message: describe_reqwest_error(error, self.config.timeout),
        }
    }
}

#[async_trait]
impl DirectionsProvider for HttpDirectionsProvider {
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        debug!(
            "requesting {} directions via {} with {} waypoints",
            request.travel_mode.as_query_value(),
            self.config.base_url,
            request.waypoints.len()
        );
        let document: Value = self
            .client
            .get(self.build_url(request))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.unavailable(err))?
            .json()
            .await
            .map_err(|err| self.unavailable(err))?;
        convert_response(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easytrip_core::TravelMode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> HttpDirectionsProvider {
        HttpDirectionsProvider::with_config(
            DirectionsConfig::new("https://routes.example.com/json").with_api_key("k"),
        )
        .expect("provider should build")
    }

    #[rstest]
    fn url_lists_optimised_waypoints(provider: HttpDirectionsProvider) {
        let request = DirectionsRequest::new(
            Coordinate::new(49.8, 24.0),
            Coordinate::new(49.9, 24.1),
            vec![Coordinate::new(49.84, 24.03), Coordinate::new(49.83, 24.01)],
            TravelMode::Walking,
        );
        let url = provider.build_url(&request);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let lookup = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(lookup("origin"), Some("49.8,24"));
        assert_eq!(lookup("destination"), Some("49.9,24.1"));
        assert_eq!(
            lookup("waypoints"),
            Some("optimize:true|49.84,24.03|49.83,24.01")
        );
        assert_eq!(lookup("mode"), Some("walking"));
        assert_eq!(lookup("key"), Some("k"));
    }

    #[rstest]
    fn url_omits_prefix_when_not_optimising(provider: HttpDirectionsProvider) {
        let mut request = DirectionsRequest::new(
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
            vec![Coordinate::new(0.5, 0.5)],
            TravelMode::Driving,
        );
        request.optimize_waypoints = false;
        let url = provider.build_url(&request);
        let waypoints = url
            .query_pairs()
            .find(|(key, _)| key == "waypoints")
            .map(|(_, value)| value.into_owned());
        assert_eq!(waypoints.as_deref(), Some("0.5,0.5"));
    }
}
