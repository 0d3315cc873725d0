//! In-memory candidate store.

use std::collections::BTreeMap;

use crate::{Candidate, Zone};

use super::CandidateStore;
use super::index::CandidateIndex;

/// Candidate store holding its whole universe in memory.
///
/// Candidates sharing an id are collapsed; the last one supplied wins.
#[derive(Debug, Default)]
pub struct MemoryCandidateStore {
    index: CandidateIndex,
}

impl MemoryCandidateStore {
    /// Build a store from a collection of candidates.
    pub fn new<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        let unique: BTreeMap<u64, Candidate> = candidates
            .into_iter()
            .map(|candidate| (candidate.id, candidate))
            .collect();
        Self {
            index: CandidateIndex::bulk_load(unique.into_values().collect()),
        }
    }

    /// Number of candidates in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Report whether the store holds no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Candidate> for MemoryCandidateStore {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl CandidateStore for MemoryCandidateStore {
    fn candidates_in_zone(&self, zone: &Zone) -> Box<dyn Iterator<Item = Candidate> + Send + '_> {
        Box::new(self.index.query(zone).into_iter())
    }
}
