//! Shared HTTP plumbing for the service adapters.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "easytrip/0.1";

/// Default request timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub(crate) const fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

pub(crate) fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}

/// Error raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

pub(crate) fn build_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ProviderBuildError> {
    Url::parse(raw).map_err(|source| ProviderBuildError::InvalidBaseUrl {
        url: raw.to_owned(),
        source,
    })
}

/// Describe a transport failure without echoing the request URL, which may
/// carry an API key.
pub(crate) fn describe_reqwest_error(error: reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        return format!("request timed out after {}s", timeout.as_secs());
    }
    if let Some(status) = error.status() {
        return format!("HTTP status {status}");
    }
    let error = error.without_url();
    if error.is_decode() {
        return format!("malformed response body: {error}");
    }
    format!("network error: {error}")
}

/// `serde` adapter storing a [`Duration`] as whole seconds.
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_base_url_is_reported() {
        let err = parse_base_url("not a url").expect_err("invalid url");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn client_builds_with_defaults() {
        assert!(build_client(DEFAULT_USER_AGENT, default_timeout()).is_ok());
    }
}
