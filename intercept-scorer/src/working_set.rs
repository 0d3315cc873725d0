//! Run-scoped columnar table of candidates.
//!
//! A [`WorkingSet`] is built once per request from the candidates inside the
//! valid zone. Rows never change after construction; columns are added and
//! rewritten in place as the pipeline normalises and smooths them. Each
//! column tracks its state so scoring an unnormalised column or smoothing a
//! column twice is reported rather than silently accepted.

use std::collections::{BTreeMap, HashSet};

use geo::Coord;
use intercept_core::{Candidate, FeatureId, SigmoidConfig};

use crate::{ScoringError, apply_sigmoid, normalise};

/// Processing stage of a feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnState {
    /// Values as materialised.
    Raw,
    /// Rescaled onto `[0, 1]` over the current rows.
    Normalised,
    /// Normalised and then passed through a sigmoid.
    Smoothed,
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    values: Vec<f64>,
    state: ColumnState,
}

/// Candidates for one selection run, stored column-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingSet {
    ids: Vec<u64>,
    locations: Vec<Coord<f64>>,
    columns: BTreeMap<FeatureId, Column>,
}

impl WorkingSet {
    /// Copy `candidates` into a new table with a raw column for each static
    /// feature in `features`.
    ///
    /// Dynamic features in `features` are skipped; see
    /// [`build_dynamic_features`](crate::build_dynamic_features).
    ///
    /// # Errors
    /// Returns [`ScoringError::MissingFeature`] when a candidate lacks a
    /// requested static feature, [`ScoringError::NonFiniteFeature`] for NaN
    /// or infinite values and [`ScoringError::DuplicateCandidate`] for a
    /// repeated id.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use intercept_core::{Candidate, FeatureId};
    /// use intercept_scorer::WorkingSet;
    ///
    /// let candidates = [
    ///     Candidate::new(1, Coord { x: 0.0, y: 0.0 }).with_feature(FeatureId::SpeedMax, 50.0),
    ///     Candidate::new(2, Coord { x: 1.0, y: 0.0 }).with_feature(FeatureId::SpeedMax, 90.0),
    /// ];
    /// let set = WorkingSet::from_candidates(candidates, [FeatureId::SpeedMax])?;
    /// assert_eq!(set.ids(), &[1, 2]);
    /// assert_eq!(set.column(FeatureId::SpeedMax), Some(&[50.0, 90.0][..]));
    /// # Ok::<(), intercept_scorer::ScoringError>(())
    /// ```
    pub fn from_candidates<C, F>(candidates: C, features: F) -> Result<Self, ScoringError>
    where
        C: IntoIterator<Item = Candidate>,
        F: IntoIterator<Item = FeatureId>,
    {
        let mut wanted: Vec<FeatureId> = features.into_iter().filter(|f| f.is_static()).collect();
        wanted.sort_unstable();
        wanted.dedup();

        let mut ids = Vec::new();
        let mut locations = Vec::new();
        let mut seen = HashSet::new();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); wanted.len()];

        for candidate in candidates {
            if !seen.insert(candidate.id) {
                return Err(ScoringError::DuplicateCandidate {
                    candidate: candidate.id,
                });
            }
            for (&feature, column) in wanted.iter().zip(values.iter_mut()) {
                let value =
                    candidate
                        .feature(feature)
                        .ok_or(ScoringError::MissingFeature {
                            candidate: candidate.id,
                            feature,
                        })?;
                if !value.is_finite() {
                    return Err(ScoringError::NonFiniteFeature {
                        candidate: candidate.id,
                        feature,
                    });
                }
                column.push(value);
            }
            ids.push(candidate.id);
            locations.push(candidate.location);
        }

        let columns = wanted
            .into_iter()
            .zip(values)
            .map(|(feature, values)| {
                (
                    feature,
                    Column {
                        values,
                        state: ColumnState::Raw,
                    },
                )
            })
            .collect();
        Ok(Self {
            ids,
            locations,
            columns,
        })
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Report whether the set holds no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Candidate identifiers in row order.
    #[must_use]
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Candidate locations in row order.
    #[must_use]
    pub fn locations(&self) -> &[Coord<f64>] {
        &self.locations
    }

    /// Values of a column, if materialised.
    #[must_use]
    pub fn column(&self, feature: FeatureId) -> Option<&[f64]> {
        self.columns.get(&feature).map(|c| c.values.as_slice())
    }

    /// Processing stage of a column, if materialised.
    #[must_use]
    pub fn column_state(&self, feature: FeatureId) -> Option<ColumnState> {
        self.columns.get(&feature).map(|c| c.state)
    }

    /// Features with a materialised column, in stable order.
    pub fn features(&self) -> impl Iterator<Item = FeatureId> + '_ {
        self.columns.keys().copied()
    }

    /// Add or replace a raw column.
    ///
    /// # Errors
    /// Returns [`ScoringError::LengthMismatch`] when `values` does not hold
    /// one entry per candidate.
    pub fn insert_column(&mut self, feature: FeatureId, values: Vec<f64>) -> Result<(), ScoringError> {
        if values.len() != self.len() {
            return Err(ScoringError::LengthMismatch {
                expected: self.len(),
                found: values.len(),
            });
        }
        self.columns.insert(
            feature,
            Column {
                values,
                state: ColumnState::Raw,
            },
        );
        Ok(())
    }

    /// Rescale a column onto `[0, 1]` over the current candidates.
    ///
    /// Normalising again recomputes the bounds and clears any smoothing
    /// state.
    ///
    /// # Errors
    /// Returns [`ScoringError::MissingColumn`] for an unknown column.
    pub fn normalise(&mut self, feature: FeatureId) -> Result<(), ScoringError> {
        let column = self.column_mut(feature)?;
        normalise(&mut column.values);
        column.state = ColumnState::Normalised;
        Ok(())
    }

    /// Normalise every materialised column.
    pub fn normalise_all(&mut self) {
        for column in self.columns.values_mut() {
            normalise(&mut column.values);
            column.state = ColumnState::Normalised;
        }
    }

    /// Smooth a normalised column with a sigmoid.
    ///
    /// # Errors
    /// Returns [`ScoringError::NotNormalised`] for a raw column,
    /// [`ScoringError::SigmoidReapplied`] for a column already smoothed and
    /// [`ScoringError::MissingColumn`] for an unknown column.
    pub fn apply_sigmoid(
        &mut self,
        feature: FeatureId,
        config: SigmoidConfig,
    ) -> Result<(), ScoringError> {
        let column = self.column_mut(feature)?;
        match column.state {
            ColumnState::Raw => Err(ScoringError::NotNormalised { feature }),
            ColumnState::Smoothed => Err(ScoringError::SigmoidReapplied { feature }),
            ColumnState::Normalised => {
                apply_sigmoid(&mut column.values, config);
                column.state = ColumnState::Smoothed;
                Ok(())
            }
        }
    }

    fn column_mut(&mut self, feature: FeatureId) -> Result<&mut Column, ScoringError> {
        self.columns
            .get_mut(&feature)
            .ok_or(ScoringError::MissingColumn { feature })
    }

    /// Pair each row with its score.
    ///
    /// # Errors
    /// Returns [`ScoringError::LengthMismatch`] when `scores` does not hold
    /// one entry per candidate.
    pub fn into_scored(self, scores: Vec<f64>) -> Result<Vec<ScoredCandidate>, ScoringError> {
        if scores.len() != self.len() {
            return Err(ScoringError::LengthMismatch {
                expected: self.len(),
                found: scores.len(),
            });
        }
        Ok(self
            .ids
            .into_iter()
            .zip(self.locations)
            .zip(scores)
            .map(|((id, location), score)| ScoredCandidate {
                id,
                location,
                score,
            })
            .collect())
    }
}

/// Candidate reduced to what the selector needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    /// Candidate identifier.
    pub id: u64,
    /// WGS84 location.
    pub location: Coord<f64>,
    /// Current score; higher is better.
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn speeds() -> WorkingSet {
        WorkingSet::from_candidates(
            [
                Candidate::new(1, Coord { x: 0.0, y: 0.0 }).with_feature(FeatureId::SpeedMax, 30.0),
                Candidate::new(2, Coord { x: 1.0, y: 0.0 }).with_feature(FeatureId::SpeedMax, 130.0),
                Candidate::new(3, Coord { x: 2.0, y: 0.0 }).with_feature(FeatureId::SpeedMax, 80.0),
            ],
            [FeatureId::SpeedMax, FeatureId::DistanceToStart],
        )
        .expect("working set")
    }

    #[rstest]
    fn dynamic_features_are_not_materialised(speeds: WorkingSet) {
        assert_eq!(speeds.features().collect::<Vec<_>>(), vec![FeatureId::SpeedMax]);
        assert_eq!(speeds.column_state(FeatureId::SpeedMax), Some(ColumnState::Raw));
    }

    #[rstest]
    fn missing_feature_fails_fast() {
        let err = WorkingSet::from_candidates(
            [
                Candidate::new(1, Coord { x: 0.0, y: 0.0 }).with_feature(FeatureId::LanesMax, 2.0),
                Candidate::new(2, Coord { x: 0.0, y: 0.0 }),
            ],
            [FeatureId::LanesMax],
        )
        .expect_err("missing feature");
        assert_eq!(
            err,
            ScoringError::MissingFeature {
                candidate: 2,
                feature: FeatureId::LanesMax
            }
        );
    }

    #[rstest]
    fn non_finite_feature_is_rejected() {
        let err = WorkingSet::from_candidates(
            [Candidate::new(4, Coord { x: 0.0, y: 0.0 }).with_feature(FeatureId::LanesMax, f64::NAN)],
            [FeatureId::LanesMax],
        )
        .expect_err("nan feature");
        assert!(matches!(err, ScoringError::NonFiniteFeature { candidate: 4, .. }));
    }

    #[rstest]
    fn duplicate_ids_are_rejected() {
        let err = WorkingSet::from_candidates(
            [
                Candidate::new(1, Coord { x: 0.0, y: 0.0 }),
                Candidate::new(1, Coord { x: 1.0, y: 1.0 }),
            ],
            [],
        )
        .expect_err("duplicate");
        assert_eq!(err, ScoringError::DuplicateCandidate { candidate: 1 });
    }

    #[rstest]
    fn sigmoid_requires_normalisation(mut speeds: WorkingSet) {
        let err = speeds
            .apply_sigmoid(FeatureId::SpeedMax, SigmoidConfig::default())
            .expect_err("raw column");
        assert_eq!(err, ScoringError::NotNormalised { feature: FeatureId::SpeedMax });
    }

    #[rstest]
    fn sigmoid_cannot_be_reapplied(mut speeds: WorkingSet) {
        speeds.normalise(FeatureId::SpeedMax).expect("normalise");
        speeds
            .apply_sigmoid(FeatureId::SpeedMax, SigmoidConfig::default())
            .expect("first application");
        let err = speeds
            .apply_sigmoid(FeatureId::SpeedMax, SigmoidConfig::default())
            .expect_err("second application");
        assert_eq!(err, ScoringError::SigmoidReapplied { feature: FeatureId::SpeedMax });
    }

    #[rstest]
    fn normalise_rescales_over_current_rows(mut speeds: WorkingSet) {
        speeds.normalise(FeatureId::SpeedMax).expect("normalise");
        assert_eq!(speeds.column(FeatureId::SpeedMax), Some(&[0.0, 1.0, 0.5][..]));
    }

    #[rstest]
    fn unknown_column_is_reported(mut speeds: WorkingSet) {
        assert_eq!(
            speeds.normalise(FeatureId::LanesAvg),
            Err(ScoringError::MissingColumn { feature: FeatureId::LanesAvg })
        );
    }

    #[rstest]
    fn inserted_columns_must_match_length(mut speeds: WorkingSet) {
        let err = speeds
            .insert_column(FeatureId::DistanceToStart, vec![1.0])
            .expect_err("short column");
        assert_eq!(err, ScoringError::LengthMismatch { expected: 3, found: 1 });
    }

    #[rstest]
    fn scored_rows_keep_ids_and_locations(speeds: WorkingSet) {
        let scored = speeds.into_scored(vec![0.1, 0.2, 0.3]).expect("scores");
        assert_eq!(scored.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(scored[2].location, Coord { x: 2.0, y: 0.0 });
        assert_eq!(scored[1].score, 0.2);
    }
}
