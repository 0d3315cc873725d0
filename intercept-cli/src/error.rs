//! Error types emitted by the intercept CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use intercept_core::{HeadingError, StrategyError};
#[cfg(feature = "store-sqlite")]
use intercept_core::SqliteCandidateStoreError;
use intercept_data::{ClientBuildError, NodeRecordError, RoadClassError};
use intercept_selector::SelectError;
use thiserror::Error;

/// Errors emitted by the intercept CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// Command that needed it.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Both an address and coordinates were supplied.
    #[error("set either --address or --lat/--lon, not both")]
    ConflictingOrigin,
    /// Coordinates fell outside the WGS84 range.
    #[error("coordinates ({lat}, {lon}) are outside the WGS84 range")]
    InvalidCoordinates {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
    /// The time budget was neither `HH:MM` nor a number of seconds.
    #[error("time budget '{value}' must be HH:MM or a number of seconds")]
    InvalidTimeBudget {
        /// Text as supplied.
        value: String,
    },
    /// The search window width was zero.
    #[error("--window must be at least one second")]
    ZeroWindow,
    /// The heading could not be parsed.
    #[error(transparent)]
    InvalidHeading(#[from] HeadingError),
    /// Opening the strategy book failed.
    #[error("failed to open strategy book at {path:?}: {source}")]
    OpenStrategies {
        /// Strategy book path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The strategy book could not be decoded or validated.
    #[error("invalid strategy book at {path:?}: {source}")]
    LoadStrategies {
        /// Strategy book path.
        path: Utf8PathBuf,
        /// Decoding or validation failure.
        #[source]
        source: StrategyError,
    },
    /// Opening the candidate database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open candidate database: {0}")]
    OpenCandidateStore(#[source] Box<SqliteCandidateStoreError>),
    /// An HTTP collaborator client could not be constructed.
    #[error("failed to build {service} client for {base_url:?}: {source}")]
    BuildClient {
        /// Which collaborator the client talks to.
        service: &'static str,
        /// Configured base URL.
        base_url: String,
        /// Construction failure.
        #[source]
        source: ClientBuildError,
    },
    /// The selection pipeline rejected the request.
    #[error("selection failed: {0}")]
    Select(#[from] SelectError),
    /// Reading road-network nodes failed.
    #[error(transparent)]
    ReadNodes(#[from] NodeRecordError),
    /// Loading the road-class speed table failed.
    #[error(transparent)]
    LoadRoadClasses(#[from] RoadClassError),
    /// The output directory could not be created.
    #[error("failed to create the directory for {path:?}: {source}")]
    CreateOutputDir {
        /// Output file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Writing the candidate database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to write candidates to {path:?}: {source}")]
    WriteCandidates {
        /// Output database path.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: Box<SqliteCandidateStoreError>,
    },
    /// Serialising the command output failed.
    #[error("failed to serialise command output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
