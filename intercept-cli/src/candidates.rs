//! Candidate database preparation for the intercept CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use intercept_core::Candidate;
use intercept_data::{RoadClassTable, read_node_records};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::select::{DEFAULT_CANDIDATES_FILE, require_existing};
use crate::{ARG_NODES, ARG_OUTPUT, ARG_ROAD_CLASSES, CliError, ENV_NODES};

/// CLI arguments for the `candidates` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "candidates",
    long_about = "Derive static features for road-network nodes and write \
                 them to a candidate database. Nodes are read from a JSON \
                 array of {id, lon, lat, segments}; segments without a \
                 maxspeed tag use the road-class speed table.",
    about = "Build a candidate database from road-network nodes"
)]
#[ortho_config(prefix = "INTERCEPT")]
pub(crate) struct CandidatesArgs {
    /// Path to the JSON node export.
    #[arg(long = ARG_NODES, value_name = "path")]
    #[serde(default)]
    pub(crate) nodes: Option<Utf8PathBuf>,
    /// Path to a JSON road-class speed table overriding the built-in one.
    #[arg(long = ARG_ROAD_CLASSES, value_name = "path")]
    #[serde(default)]
    pub(crate) road_classes: Option<Utf8PathBuf>,
    /// Database to write (default `candidates.db`).
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl CandidatesArgs {
    fn into_config(self) -> Result<CandidatesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CandidatesConfig::try_from(merged)
    }
}

/// Resolved `candidates` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CandidatesConfig {
    pub(crate) nodes: Utf8PathBuf,
    pub(crate) road_classes: Option<Utf8PathBuf>,
    pub(crate) output: Utf8PathBuf,
}

impl CandidatesConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.nodes, ARG_NODES)?;
        if let Some(path) = &self.road_classes {
            require_existing(path, ARG_ROAD_CLASSES)?;
        }
        Ok(())
    }

    fn road_class_table(&self) -> Result<RoadClassTable, CliError> {
        Ok(self
            .road_classes
            .as_deref()
            .map(RoadClassTable::load)
            .transpose()?
            .unwrap_or_default())
    }
}

impl TryFrom<CandidatesArgs> for CandidatesConfig {
    type Error = CliError;

    fn try_from(args: CandidatesArgs) -> Result<Self, Self::Error> {
        let nodes = args.nodes.ok_or(CliError::MissingArgument {
            field: ARG_NODES,
            env: ENV_NODES,
        })?;
        let output = args
            .output
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CANDIDATES_FILE));
        Ok(Self {
            nodes,
            road_classes: args.road_classes,
            output,
        })
    }
}

/// Summary printed once the database is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CandidatesSummary {
    pub(crate) candidates: usize,
    pub(crate) output: Utf8PathBuf,
}

pub(super) fn run_candidates(args: CandidatesArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_candidates_with(args, &mut stdout)
}

pub(super) fn run_candidates_with(
    args: CandidatesArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let summary = build_candidates(args)?;
    let payload = serde_json::to_string_pretty(&summary).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

pub(crate) fn build_candidates(args: CandidatesArgs) -> Result<CandidatesSummary, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let table = config.road_class_table()?;
    let candidates: Vec<Candidate> = read_node_records(&config.nodes)?
        .iter()
        .map(|record| record.to_candidate(&table))
        .collect();
    write_candidates(&config.output, &candidates)?;
    info!(
        "wrote {} candidates to {}",
        candidates.len(),
        config.output
    );
    Ok(CandidatesSummary {
        candidates: candidates.len(),
        output: config.output,
    })
}

#[cfg(feature = "store-sqlite")]
fn write_candidates(output: &Utf8Path, candidates: &[Candidate]) -> Result<(), CliError> {
    intercept_fs::ensure_parent_dir(output).map_err(|source| CliError::CreateOutputDir {
        path: output.to_path_buf(),
        source,
    })?;
    intercept_core::write_candidate_database(output.as_std_path(), candidates).map_err(|source| {
        CliError::WriteCandidates {
            path: output.to_path_buf(),
            source: Box::new(source),
        }
    })
}

#[cfg(not(feature = "store-sqlite"))]
fn write_candidates(_output: &Utf8Path, _candidates: &[Candidate]) -> Result<(), CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "candidates",
    })
}
