//! Diverse checkpoint selection for the intercept engine.
//!
//! [`DiverseSelector`] picks the best-scoring candidates one at a time,
//! rewarding the remaining candidates for their distance from each pick so
//! the checkpoints spread across the valid zone. [`Interceptor`] wires the
//! selector to the geocoder, isochrone provider and candidate store and
//! answers a complete [`SelectRequest`].

#![forbid(unsafe_code)]

mod error;
mod pipeline;
mod selector;
mod tie_break;

pub use error::{ErrorKind, SelectError};
pub use intercept_scorer::ScoredCandidate;
pub use pipeline::{
    Fulfilment, Interceptor, IsochroneWindow, Origin, SelectRequest, SelectionOutcome,
};
pub use selector::{DiverseSelection, DiverseSelector, Phase};
pub use tie_break::TieBreak;
