//! Weighted linear scoring of a prepared working set.

use intercept_core::{Candidate, Strategy};
use log::debug;

use crate::{
    ColumnState, ScoredCandidate, ScoringContext, ScoringError, WorkingSet,
    build_dynamic_features,
};

/// Compute `Σ weight × column` for every candidate.
///
/// Every feature the strategy weights must have a normalised (or smoothed)
/// column. Scores are freshly computed on every call.
///
/// # Errors
/// Returns [`ScoringError::MissingColumn`] when a weighted feature was not
/// materialised and [`ScoringError::NotNormalised`] when its column is raw.
#[expect(
    clippy::float_arithmetic,
    reason = "scores are weighted sums of normalised columns"
)]
pub fn score(working_set: &WorkingSet, strategy: &Strategy) -> Result<Vec<f64>, ScoringError> {
    let mut scores = vec![0.0; working_set.len()];
    for (feature, weight) in strategy.weights() {
        let column = working_set
            .column(feature)
            .ok_or(ScoringError::MissingColumn { feature })?;
        if working_set.column_state(feature) == Some(ColumnState::Raw) {
            return Err(ScoringError::NotNormalised { feature });
        }
        for (total, value) in scores.iter_mut().zip(column) {
            *total += weight * value;
        }
    }
    Ok(scores)
}

/// Run the full scoring pipeline for one request.
///
/// The candidates are copied into a [`WorkingSet`] holding the static
/// features the strategy weights, the weighted dynamic features are derived
/// from `context`, every column is normalised, the strategy's sigmoids are
/// applied and the weighted sum is returned alongside each candidate.
///
/// # Errors
/// Returns [`ScoringError`] when a candidate lacks a weighted feature or
/// carries invalid values.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use intercept_core::{Candidate, FeatureId, Strategy};
/// use intercept_scorer::{ScoringContext, score_candidates};
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let strategy = Strategy::builder("nearest")
///     .with_weight(FeatureId::DistanceToStart, -1.0)
///     .validate()?;
/// let candidates = [
///     Candidate::new(1, Coord { x: 0.001, y: 0.0 }),
///     Candidate::new(2, Coord { x: 0.002, y: 0.0 }),
/// ];
/// let scored = score_candidates(candidates, &strategy, &ScoringContext::new(origin, None))?;
/// assert!(scored[0].score > scored[1].score);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn score_candidates<I>(
    candidates: I,
    strategy: &Strategy,
    context: &ScoringContext,
) -> Result<Vec<ScoredCandidate>, ScoringError>
where
    I: IntoIterator<Item = Candidate>,
{
    let features: Vec<_> = strategy.weights().map(|(feature, _)| feature).collect();
    let mut working_set = WorkingSet::from_candidates(candidates, features.iter().copied())?;
    build_dynamic_features(&mut working_set, context, features)?;
    working_set.normalise_all();
    for (feature, sigmoid) in strategy.sigmoids() {
        working_set.apply_sigmoid(feature, sigmoid)?;
    }
    let scores = score(&working_set, strategy)?;
    debug!(
        "scored {} candidates with strategy '{}'",
        working_set.len(),
        strategy.name()
    );
    working_set.into_scored(scores)
}
