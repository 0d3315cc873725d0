//! Collaborator adapters and candidate preparation for the intercept engine.
//!
//! Responsibilities:
//! - HTTP clients implementing the core collaborator traits: a
//!   GraphHopper-compatible [`isochrone`] provider and a Nominatim-compatible
//!   [`geocode`]r.
//! - Derivation of static candidate features from road segments, with
//!   fallback speeds from a [`RoadClassTable`].
//!
//! Boundaries:
//! - Scoring and selection rules live in `intercept-scorer` and
//!   `intercept-selector`.
//! - The clients block on an internal runtime; the core traits stay
//!   synchronous.

pub mod geocode;
mod http;
pub mod isochrone;
mod road_class;
mod static_features;

pub use http::{ClientBuildError, DEFAULT_USER_AGENT, HttpClientConfig};
pub use road_class::{DEFAULT_SPEED_KPH, RoadClassError, RoadClassTable};
pub use static_features::{
    DEFAULT_LANES, NodeRecord, NodeRecordError, RoadSegment, derive_static_features,
    parse_maxspeed, read_node_records,
};
