//! SQLite-backed store for persisted candidates.
//!
//! The schema is a single table:
//!
//! ```sql
//! CREATE TABLE candidates (
//!     id INTEGER PRIMARY KEY,
//!     lon REAL NOT NULL,
//!     lat REAL NOT NULL,
//!     features TEXT NOT NULL
//! )
//! ```
//!
//! `features` holds a JSON object mapping static feature names to numbers.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use geo::Coord;
use log::debug;
use rusqlite::{Connection, OpenFlags, params};
use thiserror::Error;

use crate::{Candidate, FeatureId, Features, Zone};

use super::CandidateStore;
use super::index::CandidateIndex;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS candidates (
    id INTEGER PRIMARY KEY,
    lon REAL NOT NULL,
    lat REAL NOT NULL,
    features TEXT NOT NULL
)";

/// Error raised when reading or writing persisted candidates.
#[derive(Debug, Error)]
pub enum SqliteCandidateStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The stored feature payload was not a JSON object of numbers.
    #[error("failed to parse features for candidate {id}: {source}")]
    MalformedFeatures {
        /// Identifier of the offending candidate.
        id: u64,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The stored features named something other than a static feature.
    #[error("candidate {id} stores unsupported feature '{feature}'")]
    InvalidFeatures {
        /// Identifier of the offending candidate.
        id: u64,
        /// Feature name as stored.
        feature: String,
    },
    /// Encoding features for storage failed.
    #[error("failed to encode features for candidate {id}: {source}")]
    EncodeFeatures {
        /// Identifier of the offending candidate.
        id: u64,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Generic SQLite error when reading or writing rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only candidate store loaded from SQLite into an R\*-tree.
#[derive(Debug)]
pub struct SqliteCandidateStore {
    index: CandidateIndex,
}

impl SqliteCandidateStore {
    /// Open the database read-only and load every candidate.
    ///
    /// # Errors
    /// Returns [`SqliteCandidateStoreError`] when the database cannot be
    /// opened or a row carries malformed or unsupported features.
    pub fn open<P: AsRef<Path>>(database_path: P) -> Result<Self, SqliteCandidateStoreError> {
        let database_path = database_path.as_ref();
        let connection =
            Connection::open_with_flags(database_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
                |source| SqliteCandidateStoreError::OpenDatabase {
                    path: database_path.to_path_buf(),
                    source,
                },
            )?;
        let candidates = load_candidates(&connection)?;
        debug!(
            "loaded {} candidates from {}",
            candidates.len(),
            database_path.display()
        );
        Ok(Self {
            index: CandidateIndex::bulk_load(candidates),
        })
    }

    /// Number of candidates loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Report whether the database held no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CandidateStore for SqliteCandidateStore {
    fn candidates_in_zone(&self, zone: &Zone) -> Box<dyn Iterator<Item = Candidate> + Send + '_> {
        Box::new(self.index.query(zone).into_iter())
    }
}

fn load_candidates(connection: &Connection) -> Result<Vec<Candidate>, SqliteCandidateStoreError> {
    let mut statement =
        connection.prepare("SELECT id, lon, lat, features FROM candidates ORDER BY id")?;
    let mut rows = statement.query([])?;
    let mut candidates = Vec::new();

    while let Some(row) = rows.next()? {
        let id: u64 = row.get(0)?;
        let lon: f64 = row.get(1)?;
        let lat: f64 = row.get(2)?;
        let features_json: String = row.get(3)?;
        let features = decode_features(id, &features_json)?;
        candidates.push(Candidate::with_features(
            id,
            Coord { x: lon, y: lat },
            features,
        ));
    }

    Ok(candidates)
}

fn decode_features(id: u64, json: &str) -> Result<Features, SqliteCandidateStoreError> {
    let raw: BTreeMap<String, f64> = serde_json::from_str(json)
        .map_err(|source| SqliteCandidateStoreError::MalformedFeatures { id, source })?;
    raw.into_iter()
        .map(|(name, value)| {
            name.parse::<FeatureId>()
                .ok()
                .filter(|feature| feature.is_static())
                .map(|feature| (feature, value))
                .ok_or(SqliteCandidateStoreError::InvalidFeatures { id, feature: name })
        })
        .collect()
}

/// Create the candidate table at `path` and insert `candidates`.
///
/// Existing rows with the same id are replaced. Used by tooling that
/// prepares candidate databases and by tests.
///
/// # Errors
/// Returns [`SqliteCandidateStoreError`] when the database cannot be opened
/// or written.
pub fn write_candidate_database(
    path: &Path,
    candidates: &[Candidate],
) -> Result<(), SqliteCandidateStoreError> {
    let mut connection =
        Connection::open(path).map_err(|source| SqliteCandidateStoreError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
    connection.execute(CREATE_TABLE, [])?;
    let tx = connection.transaction()?;
    {
        let mut insert = tx.prepare(
            "INSERT OR REPLACE INTO candidates (id, lon, lat, features) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for candidate in candidates {
            let named: BTreeMap<&str, f64> = candidate
                .features
                .iter()
                .map(|(feature, value)| (feature.as_str(), *value))
                .collect();
            let features = serde_json::to_string(&named).map_err(|source| {
                SqliteCandidateStoreError::EncodeFeatures {
                    id: candidate.id,
                    source,
                }
            })?;
            insert.execute(params![
                candidate.id,
                candidate.location.x,
                candidate.location.y,
                features
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}
