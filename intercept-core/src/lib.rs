//! Core domain types for the intercept engine.
//!
//! The crate defines candidates and their features, strategies, headings,
//! search zones and the traits behind which external collaborators sit:
//! geocoding, isochrone computation and candidate storage. Validation happens
//! at construction so later pipeline stages can trust their inputs.

pub mod candidate;
pub mod feature;
pub mod geocode;
pub mod heading;
pub mod isochrone;
pub mod store;
pub mod strategy;
#[doc(hidden)]
pub mod test_support;
pub mod zone;

pub use candidate::{Candidate, Features};
pub use feature::{FeatureId, FeatureKind, UnknownFeatureError};
pub use geocode::{GeocodeError, Geocoder};
pub use heading::{CompassPoint, Heading, HeadingError};
pub use isochrone::{IsochroneError, IsochroneProvider};
pub use store::{CandidateStore, MemoryCandidateStore};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteCandidateStore, SqliteCandidateStoreError, write_candidate_database};
#[cfg(feature = "serde")]
pub use strategy::StrategyConfig;
pub use strategy::{SigmoidConfig, Strategy, StrategyBook, StrategyBuilder, StrategyError};
pub use zone::{IsochroneRole, IsochroneSet, ReducedZones, Zone, ZoneError, reduce_isochrones};
