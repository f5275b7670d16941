//! Address resolution.

use async_trait::async_trait;
use thiserror::Error;

use crate::Coordinate;

/// Errors from [`AddressResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The address was empty once trimmed.
    #[error("an address is required")]
    EmptyInput,
    /// The service answered but found no match.
    #[error("no location found for '{query}'")]
    NotFound {
        /// The address that was looked up.
        query: String,
    },
    /// The service could not be reached or answered unexpectedly.
    #[error("geocoding service unavailable: {message}")]
    Unavailable {
        /// Human-readable cause.
        message: String,
    },
}

/// Turn a free-text address into a coordinate.
///
/// Only the first match is used; disambiguation is out of scope.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use easytrip_core::{AddressResolver, Coordinate, GeocodeError};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl AddressResolver for Fixed {
///     async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
///         if address.trim().is_empty() {
///             return Err(GeocodeError::EmptyInput);
///         }
///         Ok(Coordinate::new(49.84, 24.03))
///     }
/// }
/// ```
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolve `address` to the first matching coordinate.
    ///
    /// Implementations must return [`GeocodeError::EmptyInput`] for blank
    /// input without contacting any remote service.
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}
