//! Errors surfaced by [`crate::Interceptor::select_points`].

use intercept_core::{GeocodeError, IsochroneError, IsochroneRole, StrategyError, ZoneError};
use intercept_scorer::ScoringError;
use thiserror::Error;

/// Broad classification of a [`SelectError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request or configuration was invalid; retrying will not help.
    Input,
    /// An external collaborator failed or returned nothing usable.
    Upstream,
}

/// Errors raised while answering a selection request.
#[derive(Debug, Error)]
pub enum SelectError {
    /// The number of requested points was zero.
    #[error("at least one point must be requested")]
    ZeroPoints,
    /// The time budget was zero.
    #[error("time budget must be positive")]
    ZeroTimeBudget,
    /// The strategy was unknown or invalid.
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    /// The origin address could not be geocoded.
    #[error("failed to geocode the origin")]
    Geocode(#[source] GeocodeError),
    /// An isochrone could not be computed.
    #[error("failed to compute the {role} isochrone")]
    Isochrone {
        /// Which isochrone of the window failed.
        role: IsochroneRole,
        /// Provider error.
        #[source]
        source: IsochroneError,
    },
    /// An isochrone polygon was rejected.
    #[error(transparent)]
    Zone(#[from] ZoneError),
    /// Candidate data did not satisfy the strategy.
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl SelectError {
    /// Classify the error for callers deciding whether to retry.
    ///
    /// # Examples
    /// ```
    /// use intercept_core::GeocodeError;
    /// use intercept_selector::{ErrorKind, SelectError};
    ///
    /// assert_eq!(SelectError::ZeroPoints.kind(), ErrorKind::Input);
    /// let missing = SelectError::Geocode(GeocodeError::NotFound { address: "nowhere".into() });
    /// assert_eq!(missing.kind(), ErrorKind::Upstream);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Geocode(GeocodeError::EmptyAddress) => ErrorKind::Input,
            Self::Geocode(_) | Self::Isochrone { .. } => ErrorKind::Upstream,
            Self::ZeroPoints
            | Self::ZeroTimeBudget
            | Self::Strategy(_)
            | Self::Zone(_)
            | Self::Scoring(_) => ErrorKind::Input,
        }
    }

    /// Whether the failure came from an unreachable collaborator rather than
    /// from the answer it gave.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        match self {
            Self::Geocode(source) => source.is_unavailable(),
            Self::Isochrone { source, .. } => source.is_unavailable(),
            _ => false,
        }
    }
}
