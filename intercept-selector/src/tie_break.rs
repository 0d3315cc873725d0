//! Policies for choosing among equally attractive candidates.

use std::num::NonZeroUsize;

/// How the selector picks the next candidate from the ranked pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Take the highest score; equal scores resolve to the lowest id.
    #[default]
    LowestId,
    /// Pick uniformly among the `width` best remaining candidates using a
    /// generator seeded with `seed`.
    ///
    /// Runs with the same seed and pool produce the same sequence.
    SampleTop {
        /// Number of leading candidates eligible at each step.
        width: NonZeroUsize,
        /// Seed for the `ChaCha8` generator.
        seed: u64,
    },
}

impl TieBreak {
    /// Build a sampling policy.
    ///
    /// A `width` of one behaves like [`TieBreak::LowestId`].
    #[must_use]
    pub const fn sample_top(width: NonZeroUsize, seed: u64) -> Self {
        Self::SampleTop { width, seed }
    }

    /// Whether the policy draws random numbers.
    #[must_use]
    pub const fn is_random(self) -> bool {
        matches!(self, Self::SampleTop { width, .. } if width.get() > 1)
    }
}
