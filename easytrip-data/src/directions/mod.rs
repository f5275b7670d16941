//! Optimised multi-stop directions over HTTP.
//!
//! [`HttpDirectionsProvider`] implements [`easytrip_core::DirectionsProvider`]
//! against a service speaking the Google Directions JSON format. The whole
//! response document is kept as the opaque path payload so a map surface can
//! draw it unchanged.

mod google;
mod provider;

pub use provider::{DEFAULT_DIRECTIONS_URL, DirectionsConfig, HttpDirectionsProvider};
