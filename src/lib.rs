//! Facade crate for the intercept checkpoint engine.
//!
//! This crate re-exports the core domain types and exposes the selection
//! pipeline, HTTP collaborators and the SQLite candidate store behind feature
//! flags.

#![forbid(unsafe_code)]

pub use intercept_core::{
    Candidate, CandidateStore, CompassPoint, FeatureId, Features, GeocodeError, Geocoder, Heading,
    IsochroneError, IsochroneProvider, MemoryCandidateStore, ReducedZones, SigmoidConfig,
    Strategy, StrategyBook, StrategyError, Zone,
};
pub use intercept_scorer::{ScoringContext, ScoringError, score_candidates};

#[cfg(feature = "store-sqlite")]
pub use intercept_core::{SqliteCandidateStore, SqliteCandidateStoreError};

#[cfg(feature = "selector")]
pub use intercept_selector::{
    DiverseSelector, ErrorKind, Fulfilment, Interceptor, IsochroneWindow, Origin, ScoredCandidate,
    SelectError, SelectRequest, SelectionOutcome, TieBreak,
};

#[cfg(feature = "http")]
pub use intercept_data::{
    geocode::HttpGeocoder,
    isochrone::{HttpIsochroneProvider, HttpIsochroneProviderConfig},
};
