//! Greedy diverse top-K selection with distance repulsion.
//!
//! Each step takes the best remaining candidate, removes it from the pool and
//! rewards the survivors for being far from it. Pure top-1 re-ranking makes
//! this a greedy dispersion heuristic running in `O(K·N)`.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use geo::Coord;
use intercept_core::{SigmoidConfig, Strategy};
use intercept_scorer::{ScoredCandidate, apply_sigmoid, distances_from, normalise};
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::TieBreak;

/// Progress of a [`DiverseSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scores are computed and nothing has been picked yet.
    Ready,
    /// `step` candidates have been picked and more may follow.
    Selecting {
        /// Number of picks made so far.
        step: usize,
    },
    /// No further picks will be produced.
    Done,
}

/// Repulsion settings and tie-break policy for one selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiverseSelector {
    repulsion_weight: f64,
    repulsion_sigmoid: Option<SigmoidConfig>,
    tie_break: TieBreak,
}

impl DiverseSelector {
    /// Selector rewarding distance from previous picks by `repulsion_weight`.
    #[must_use]
    pub const fn new(repulsion_weight: f64) -> Self {
        Self {
            repulsion_weight,
            repulsion_sigmoid: None,
            tie_break: TieBreak::LowestId,
        }
    }

    /// Smooth the normalised repulsion distances before weighting them.
    #[must_use]
    pub const fn with_repulsion_sigmoid(mut self, sigmoid: SigmoidConfig) -> Self {
        self.repulsion_sigmoid = Some(sigmoid);
        self
    }

    /// Replace the tie-break policy.
    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Selector configured from a strategy's repulsion settings.
    #[must_use]
    pub const fn from_strategy(strategy: &Strategy, tie_break: TieBreak) -> Self {
        Self {
            repulsion_weight: strategy.repulsion_weight(),
            repulsion_sigmoid: strategy.repulsion_sigmoid(),
            tie_break,
        }
    }

    /// Configured repulsion weight.
    #[must_use]
    pub const fn repulsion_weight(&self) -> f64 {
        self.repulsion_weight
    }

    /// Configured tie-break policy.
    #[must_use]
    pub const fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Start a selection of at most `k` candidates from `pool`.
    ///
    /// The returned iterator yields picks in order. Stopping early between
    /// items cancels the run.
    #[must_use]
    pub fn run(&self, pool: Vec<ScoredCandidate>, k: usize) -> DiverseSelection {
        let sampler = match self.tie_break {
            TieBreak::LowestId => None,
            TieBreak::SampleTop { width, seed } => {
                Some((width, ChaCha8Rng::seed_from_u64(seed)))
            }
        };
        DiverseSelection {
            pool,
            k,
            picked: 0,
            phase: Phase::Ready,
            repulsion_weight: self.repulsion_weight,
            repulsion_sigmoid: self.repulsion_sigmoid,
            sampler,
        }
    }

    /// Run the selection to completion.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use intercept_scorer::ScoredCandidate;
    /// use intercept_selector::DiverseSelector;
    ///
    /// let pool = vec![
    ///     ScoredCandidate { id: 1, location: Coord { x: 0.0, y: 0.0 }, score: 0.2 },
    ///     ScoredCandidate { id: 2, location: Coord { x: 0.01, y: 0.0 }, score: 0.9 },
    /// ];
    /// let picks = DiverseSelector::new(0.0).select(pool, 1);
    /// assert_eq!(picks.len(), 1);
    /// assert_eq!(picks[0].id, 2);
    /// ```
    #[must_use]
    pub fn select(&self, pool: Vec<ScoredCandidate>, k: usize) -> Vec<ScoredCandidate> {
        self.run(pool, k).collect()
    }
}

/// Iterator over the picks of one selection run.
///
/// The selection owns its pool; scores are updated in place as picks are
/// made and are never shared with another run.
#[derive(Debug)]
pub struct DiverseSelection {
    pool: Vec<ScoredCandidate>,
    k: usize,
    picked: usize,
    phase: Phase,
    repulsion_weight: f64,
    repulsion_sigmoid: Option<SigmoidConfig>,
    sampler: Option<(NonZeroUsize, ChaCha8Rng)>,
}

impl DiverseSelection {
    /// Current phase of the run.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Candidates still eligible, with their current scores.
    #[must_use]
    pub fn remaining(&self) -> &[ScoredCandidate] {
        &self.pool
    }

    fn choose_index(&mut self) -> Option<usize> {
        match self.sampler.as_mut() {
            None => self
                .pool
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| rank(a, b))
                .map(|(index, _)| index),
            Some((width, rng)) => {
                let mut ranked: Vec<usize> = (0..self.pool.len()).collect();
                ranked.sort_by(|&a, &b| match (self.pool.get(a), self.pool.get(b)) {
                    (Some(left), Some(right)) => rank(left, right),
                    _ => Ordering::Equal,
                });
                ranked.truncate(width.get());
                if ranked.is_empty() {
                    return None;
                }
                let choice = rng.gen_range(0..ranked.len());
                ranked.get(choice).copied()
            }
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "repulsion adds a weighted distance to each score"
    )]
    fn repel(&mut self, last: Coord<f64>) {
        let locations: Vec<_> = self.pool.iter().map(|c| c.location).collect();
        let mut distances = distances_from(&locations, last);
        normalise(&mut distances);
        if let Some(sigmoid) = self.repulsion_sigmoid {
            apply_sigmoid(&mut distances, sigmoid);
        }
        for (candidate, distance) in self.pool.iter_mut().zip(distances) {
            candidate.score += self.repulsion_weight * distance;
        }
    }
}

impl Iterator for DiverseSelection {
    type Item = ScoredCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.phase == Phase::Done {
            return None;
        }
        if self.picked >= self.k || self.pool.is_empty() {
            self.phase = Phase::Done;
            return None;
        }
        let Some(index) = self.choose_index() else {
            self.phase = Phase::Done;
            return None;
        };
        let pick = self.pool.remove(index);
        self.picked += 1;
        trace!(
            "pick {} is candidate {} with score {}",
            self.picked, pick.id, pick.score
        );
        if self.picked < self.k && !self.pool.is_empty() {
            self.repel(pick.location);
            self.phase = Phase::Selecting { step: self.picked };
        } else {
            self.phase = Phase::Done;
        }
        Some(pick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.phase == Phase::Done {
            return (0, Some(0));
        }
        let left = self.k.saturating_sub(self.picked).min(self.pool.len());
        (left, Some(left))
    }
}

/// Order better candidates first: higher score, then lower id.
fn rank(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}
