//! HTTP geocoder for Nominatim-compatible services.
//!
//! # Example
//!
//! ```no_run
//! use intercept_core::Geocoder;
//! use intercept_data::geocode::HttpGeocoder;
//!
//! let geocoder = HttpGeocoder::new("https://nominatim.openstreetmap.org")?;
//! let location = geocoder.geocode("Place du Capitole, Toulouse")?;
//! println!("lat {} lon {}", location.y, location.x);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

pub use provider::{DEFAULT_GEOCODER_URL, HttpGeocoder};
