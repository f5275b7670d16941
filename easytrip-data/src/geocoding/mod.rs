//! Address geocoding over HTTP.
//!
//! [`HttpGeocoder`] implements [`easytrip_core::AddressResolver`] against a
//! service speaking the Google Geocoding JSON format. Only the first result
//! is used.
//!
//! # Example
//!
//! ```no_run
//! use easytrip_core::AddressResolver;
//! use easytrip_data::geocoding::{GeocoderConfig, HttpGeocoder};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let geocoder = HttpGeocoder::with_config(GeocoderConfig::default().with_api_key("secret"))?;
//! let opera = geocoder.resolve("Lviv Opera").await?;
//! println!("{}, {}", opera.lat(), opera.lng());
//! # Ok(())
//! # }
//! ```

mod google;
mod provider;

pub use provider::{DEFAULT_GEOCODER_URL, GeocoderConfig, HttpGeocoder};
