//! HTTP [`AddressResolver`] backed by a Google-style geocoding endpoint.

use std::time::Duration;

use async_trait::async_trait;
use easytrip_core::{AddressResolver, Coordinate, GeocodeError};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::google::GeocodeResponse;
use crate::http::{
    ProviderBuildError, build_client, default_timeout, default_user_agent, describe_reqwest_error,
    duration_secs, parse_base_url,
};

/// Default geocoding endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Configuration for [`HttpGeocoder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Endpoint URL; the address is sent as the `address` query parameter.
    pub base_url: String,
    /// API key sent as the `key` query parameter, if any.
    pub api_key: Option<String>,
    /// Request timeout.
    #[serde(with = "duration_secs", rename = "timeout_secs")]
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_URL.to_owned(),
            api_key: None,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl GeocoderConfig {
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

/// Geocoder issuing one `GET` per address.
pub struct HttpGeocoder {
    client: Client,
    base_url: Url,
    config: GeocoderConfig,
}

impl std::fmt::Debug for HttpGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeocoder")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(GeocoderConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client fails to build.
    pub fn with_config(config: GeocoderConfig) -> Result<Self, ProviderBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn build_url(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("address", address);
            if let Some(key) = &self.config.api_key {
                query.append_pair("key", key);
            }
        }
        url
    }

    fn unavailable(&self, error: reqwest::Error) -> GeocodeError {
        GeocodeError::Unavailable {
            message: describe_reqwest_error(error, self.config.timeout),
        }
    }
}

#[async_trait]
impl AddressResolver for HttpGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyInput);
        }
        debug!("geocoding '{address}' via {}", self.config.base_url);
        let response: GeocodeResponse = self
            .client
            .get(self.build_url(address))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.unavailable(err))?
            .json()
            .await
            .map_err(|err| self.unavailable(err))?;
        response.into_coordinate(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn url_carries_address_and_key() {
        let geocoder = HttpGeocoder::with_config(
            GeocoderConfig::new("https://geo.example.com/json").with_api_key("k3y"),
        )
        .expect("geocoder should build");
        let url = geocoder.build_url("Rynok Square 1, Lviv");
        assert_eq!(
            url.as_str(),
            "https://geo.example.com/json?address=Rynok+Square+1%2C+Lviv&key=k3y"
        );
    }

    #[rstest]
    fn url_omits_missing_key() {
        let geocoder = HttpGeocoder::new("https://geo.example.com/json").expect("geocoder");
        assert!(!geocoder.build_url("Opera").as_str().contains("key="));
    }

    #[tokio::test]
    async fn blank_address_fails_without_a_request() {
        // Unroutable address: a request would fail with Unavailable, not EmptyInput.
        let geocoder = HttpGeocoder::new("http://127.0.0.1:9/json").expect("geocoder");
        assert_eq!(geocoder.resolve("   ").await, Err(GeocodeError::EmptyInput));
    }

    #[test]
    fn config_deserialises_with_defaults() {
        let config: GeocoderConfig =
            serde_json::from_str(r#"{"api_key": "abc", "timeout_secs": 5}"#).expect("config");
        assert_eq!(config.base_url, DEFAULT_GEOCODER_URL);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let geocoder =
            HttpGeocoder::with_config(GeocoderConfig::default().with_api_key("s3cret"))
                .expect("geocoder");
        assert!(!format!("{geocoder:?}").contains("s3cret"));
    }
}
