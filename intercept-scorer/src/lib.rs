//! Scoring of candidate checkpoints for the intercept engine.
//!
//! The crate turns the candidates inside a valid zone into comparable scores:
//! - a run-scoped [`WorkingSet`] holds one column per weighted feature;
//! - dynamic columns (distance to the origin, deviation from the escape
//!   heading) are derived per request by [`build_dynamic_features`];
//! - every column is min-max [`normalise`]d and optionally smoothed with a
//!   [`sigmoid`];
//! - [`score`] combines the columns linearly using a
//!   [`Strategy`](intercept_core::Strategy).
//!
//! [`score_candidates`] runs the whole sequence for one request.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use intercept_core::{Candidate, FeatureId, Strategy};
//! use intercept_scorer::{ScoringContext, score_candidates};
//!
//! let strategy = Strategy::builder("fast")
//!     .with_weight(FeatureId::SpeedMax, 1.0)
//!     .validate()?;
//! let candidates = [
//!     Candidate::new(1, Coord { x: 0.0, y: 0.0 }).with_feature(FeatureId::SpeedMax, 50.0),
//!     Candidate::new(2, Coord { x: 0.1, y: 0.0 }).with_feature(FeatureId::SpeedMax, 110.0),
//! ];
//! let context = ScoringContext::new(Coord { x: 0.0, y: 0.0 }, None);
//! let scored = score_candidates(candidates, &strategy, &context)?;
//! assert_eq!(scored[1].score, 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod features;
mod normalise;
mod score;
mod sigmoid;
mod working_set;

pub use error::ScoringError;
pub use features::{
    ScoringContext, angular_deviation, build_dynamic_features, deviations_from, distance_m,
    distances_from,
};
pub use normalise::{FLAT_VALUE, normalise};
pub use score::{score, score_candidates};
pub use sigmoid::{apply_sigmoid, sigmoid};
pub use working_set::{ColumnState, ScoredCandidate, WorkingSet};
