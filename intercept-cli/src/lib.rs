//! Command-line interface for the intercept engine.
//!
//! `intercept select` answers a checkpoint request against a prepared
//! candidate database and prints the chosen points as JSON.
//! `intercept candidates` prepares that database from road-network nodes.
//! Options layer CLI flags over configuration files and `INTERCEPT_*`
//! environment variables.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod candidates;
mod error;
mod select;

pub use error::CliError;

use candidates::{CandidatesArgs, run_candidates};
use select::{SelectArgs, run_select};

pub(crate) const ARG_DATA_DIR: &str = "data-dir";
pub(crate) const ARG_STRATEGY: &str = "strategy";
pub(crate) const ARG_STRATEGIES: &str = "strategies";
pub(crate) const ARG_CANDIDATES_DB: &str = "candidates-db";
pub(crate) const ARG_ADDRESS: &str = "address";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_TIME_BUDGET: &str = "time-budget";
pub(crate) const ARG_WINDOW: &str = "window";
pub(crate) const ARG_HORIZON: &str = "horizon";
pub(crate) const ARG_HEADING: &str = "heading";
pub(crate) const ARG_POINTS: &str = "points";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_SAMPLE_WIDTH: &str = "sample-width";
pub(crate) const ARG_ISOCHRONE_URL: &str = "isochrone-url";
pub(crate) const ARG_PROFILE: &str = "profile";
pub(crate) const ARG_GEOCODER_URL: &str = "geocoder-url";
pub(crate) const ARG_NODES: &str = "nodes";
pub(crate) const ARG_ROAD_CLASSES: &str = "road-classes";
pub(crate) const ARG_OUTPUT: &str = "output";

pub(crate) const ENV_STRATEGY: &str = "INTERCEPT_CMDS_SELECT_STRATEGY";
pub(crate) const ENV_ADDRESS: &str = "INTERCEPT_CMDS_SELECT_ADDRESS";
pub(crate) const ENV_LAT: &str = "INTERCEPT_CMDS_SELECT_LAT";
pub(crate) const ENV_LON: &str = "INTERCEPT_CMDS_SELECT_LON";
pub(crate) const ENV_TIME_BUDGET: &str = "INTERCEPT_CMDS_SELECT_TIME_BUDGET";
pub(crate) const ENV_POINTS: &str = "INTERCEPT_CMDS_SELECT_POINTS";
pub(crate) const ENV_SEED: &str = "INTERCEPT_CMDS_SELECT_SEED";
pub(crate) const ENV_NODES: &str = "INTERCEPT_CMDS_CANDIDATES_NODES";

/// Run the intercept CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid, inputs are missing, or
/// the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Select(args) => run_select(args),
        Command::Candidates(args) => run_candidates(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "intercept",
    about = "Choose interception checkpoints around a last known position",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Select diverse checkpoints for a pursuit request.
    Select(SelectArgs),
    /// Build a candidate database from road-network nodes.
    Candidates(CandidatesArgs),
}

#[cfg(test)]
mod tests;
