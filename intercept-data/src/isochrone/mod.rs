//! HTTP isochrone provider for GraphHopper-compatible services.
//!
//! [`HttpIsochroneProvider`] implements
//! [`intercept_core::IsochroneProvider`] against the `/isochrone` endpoint,
//! requesting a single bucket and reading the first polygon of the response.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use geo::Coord;
//! use intercept_core::IsochroneProvider;
//! use intercept_data::isochrone::{HttpIsochroneProvider, HttpIsochroneProviderConfig};
//!
//! let config = HttpIsochroneProviderConfig::new("http://localhost:8989").with_profile("foot");
//! let provider = HttpIsochroneProvider::with_config(config)?;
//! let polygon = provider.isochrone(Coord { x: 1.44, y: 43.6 }, Duration::from_secs(900))?;
//! println!("{} vertices", polygon.exterior().0.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod graphhopper;
mod provider;

pub use provider::{DEFAULT_ISOCHRONE_URL, HttpIsochroneProvider, HttpIsochroneProviderConfig};
