//! Data access for candidate checkpoints.
//!
//! The `CandidateStore` trait defines a read-only query returning every
//! [`Candidate`] inside a [`Zone`]. Implementations keep candidates in an
//! R\*-tree and refine the bounding-box hits with an exact polygon test.

use crate::{Candidate, Zone};

mod index;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryCandidateStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteCandidateStore, SqliteCandidateStoreError, write_candidate_database};

/// Read-only access to the universe of candidates.
///
/// Coordinates use WGS84 (`x = longitude`, `y = latitude`).
///
/// # Examples
///
/// ```rust
/// use geo::{Coord, polygon};
/// use intercept_core::{Candidate, CandidateStore, MemoryCandidateStore, Zone};
///
/// let store = MemoryCandidateStore::new([
///     Candidate::new(2, Coord { x: 0.5, y: 0.5 }),
///     Candidate::new(1, Coord { x: 0.0, y: 0.0 }),
///     Candidate::new(3, Coord { x: 5.0, y: 5.0 }),
/// ]);
/// let zone = Zone::from(polygon![
///     (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0),
/// ]);
///
/// let ids: Vec<_> = store.candidates_in_zone(&zone).map(|c| c.id).collect();
/// assert_eq!(ids, vec![1, 2]);
/// ```
pub trait CandidateStore {
    /// Return all candidates inside or on the boundary of `zone`, sorted by
    /// id.
    ///
    /// An empty zone, or a zone with no candidates, yields an empty
    /// iterator.
    fn candidates_in_zone(&self, zone: &Zone) -> Box<dyn Iterator<Item = Candidate> + Send + '_>;
}

impl<T: CandidateStore + ?Sized> CandidateStore for &T {
    fn candidates_in_zone(&self, zone: &Zone) -> Box<dyn Iterator<Item = Candidate> + Send + '_> {
        (**self).candidates_in_zone(zone)
    }
}
