//! R\*-tree shared by the candidate store implementations.

use std::fmt;

use rstar::{AABB, RTree};

use crate::{Candidate, Zone};

/// Bulk-loaded spatial index over candidates.
pub(crate) struct CandidateIndex {
    tree: RTree<Candidate>,
}

impl Default for CandidateIndex {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl fmt::Debug for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateIndex")
            .field("entries", &self.tree.size())
            .finish_non_exhaustive()
    }
}

impl CandidateIndex {
    pub(crate) fn bulk_load(candidates: Vec<Candidate>) -> Self {
        Self {
            tree: RTree::bulk_load(candidates),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.size()
    }

    /// Candidates inside `zone`, sorted by id.
    pub(crate) fn query(&self, zone: &Zone) -> Vec<Candidate> {
        let Some(rect) = zone.bounding_rect() else {
            return Vec::new();
        };
        let envelope =
            AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
        let mut found: Vec<_> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|candidate| zone.contains(&candidate.location))
            .cloned()
            .collect();
        found.sort_unstable_by_key(|candidate| candidate.id);
        found
    }
}
