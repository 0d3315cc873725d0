//! Error types raised while building and scoring a working set.

use intercept_core::FeatureId;
use thiserror::Error;

/// Errors raised by the scoring pipeline.
///
/// Every variant describes a caller or configuration mistake; arithmetic
/// edge cases such as flat columns have defined fallbacks instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// A weighted static feature was absent from a candidate.
    #[error("candidate {candidate} has no value for weighted feature '{feature}'")]
    MissingFeature {
        /// Identifier of the incomplete candidate.
        candidate: u64,
        /// Feature the strategy weights.
        feature: FeatureId,
    },
    /// A feature value was NaN or infinite.
    #[error("candidate {candidate} has a non-finite value for '{feature}'")]
    NonFiniteFeature {
        /// Identifier of the offending candidate.
        candidate: u64,
        /// Feature carrying the value.
        feature: FeatureId,
    },
    /// Two candidates shared an identifier.
    #[error("candidate {candidate} appears more than once")]
    DuplicateCandidate {
        /// Repeated identifier.
        candidate: u64,
    },
    /// An operation referenced a column that was never materialised.
    #[error("column '{feature}' is not part of the working set")]
    MissingColumn {
        /// Requested column.
        feature: FeatureId,
    },
    /// A column was smoothed or scored before being normalised.
    #[error("column '{feature}' must be normalised first")]
    NotNormalised {
        /// Column in its raw state.
        feature: FeatureId,
    },
    /// A sigmoid was applied twice to the same column.
    #[error("sigmoid already applied to column '{feature}'")]
    SigmoidReapplied {
        /// Column that was already smoothed.
        feature: FeatureId,
    },
    /// A column or score vector did not match the working set length.
    #[error("expected {expected} values, found {found}")]
    LengthMismatch {
        /// Number of candidates in the working set.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
}
