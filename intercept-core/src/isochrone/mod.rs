//! Fetch isochrone polygons from an external time-distance service.
//!
//! The [`IsochroneProvider`] trait abstracts the service that computes the
//! area reachable from a point within a time limit. Callers receive a single
//! polygon in WGS84 (`x = longitude`, `y = latitude`).
//!
//! Errors distinguish an unreachable service from a response that carried no
//! usable polygon.

mod error;
mod provider;

pub use error::IsochroneError;
pub use provider::IsochroneProvider;
