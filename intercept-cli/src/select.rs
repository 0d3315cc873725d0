//! Select command implementation for the intercept CLI.

use std::io::Write;
use std::num::NonZeroUsize;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use geo::Coord;
use intercept_core::{Heading, StrategyBook};
use intercept_data::HttpClientConfig;
use intercept_data::geocode::{DEFAULT_GEOCODER_URL, HttpGeocoder};
use intercept_data::isochrone::{
    DEFAULT_ISOCHRONE_URL, HttpIsochroneProvider, HttpIsochroneProviderConfig,
};
use intercept_fs::open_utf8_file;
use intercept_selector::{
    Fulfilment, Interceptor, IsochroneWindow, Origin, SelectError, SelectRequest,
    SelectionOutcome, TieBreak,
};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ADDRESS, ARG_CANDIDATES_DB, ARG_DATA_DIR, ARG_GEOCODER_URL, ARG_HEADING, ARG_HORIZON,
    ARG_ISOCHRONE_URL, ARG_LAT, ARG_LON, ARG_POINTS, ARG_PROFILE, ARG_SAMPLE_WIDTH, ARG_SEED,
    ARG_STRATEGIES, ARG_STRATEGY, ARG_TIME_BUDGET, ARG_WINDOW, CliError, ENV_ADDRESS, ENV_LAT,
    ENV_LON, ENV_POINTS, ENV_SEED, ENV_STRATEGY, ENV_TIME_BUDGET,
};

/// File name of the strategy book inside the data directory.
pub(crate) const DEFAULT_STRATEGIES_FILE: &str = "strategies.json";
/// File name of the candidate database inside the data directory.
pub(crate) const DEFAULT_CANDIDATES_FILE: &str = "candidates.db";
/// Candidates eligible per step when only `--seed` is given.
pub(crate) const DEFAULT_SAMPLE_WIDTH: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(width) => width,
    None => NonZeroUsize::MIN,
};

/// CLI arguments for the `select` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "select",
    long_about = "Select diverse checkpoints reachable from the last known \
                 position. The valid zone lies between the isochrones for the \
                 time budget and the budget plus the window; candidates are \
                 read from a prepared SQLite database and ranked with a named \
                 strategy from the strategy book.",
    about = "Select interception checkpoints"
)]
#[ortho_config(prefix = "INTERCEPT")]
pub(crate) struct SelectArgs {
    /// Directory holding `strategies.json` and `candidates.db`.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Name of the strategy to rank candidates with.
    #[arg(long = ARG_STRATEGY, value_name = "name")]
    #[serde(default)]
    pub(crate) strategy: Option<String>,
    /// Override the path to the strategy book.
    #[arg(long = ARG_STRATEGIES, value_name = "path")]
    #[serde(default)]
    pub(crate) strategies: Option<Utf8PathBuf>,
    /// Override the path to the candidate database.
    #[arg(long = ARG_CANDIDATES_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) candidates_db: Option<Utf8PathBuf>,
    /// Free-form address of the last known position.
    #[arg(long = ARG_ADDRESS, value_name = "text")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Latitude of the last known position.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the last known position.
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Time elapsed since the last sighting, as `HH:MM` or seconds.
    #[arg(long = ARG_TIME_BUDGET, value_name = "time")]
    #[serde(default)]
    pub(crate) time_budget: Option<String>,
    /// Width of the valid zone in seconds (default 1800).
    #[arg(long = ARG_WINDOW, value_name = "seconds")]
    #[serde(default)]
    pub(crate) window: Option<u64>,
    /// Width of the probable zone beyond the window in seconds; 0 disables
    /// it (default 600).
    #[arg(long = ARG_HORIZON, value_name = "seconds")]
    #[serde(default)]
    pub(crate) horizon: Option<u64>,
    /// Escape heading as degrees or a compass label such as `NE`.
    #[arg(long = ARG_HEADING, value_name = "heading", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) heading: Option<String>,
    /// Number of checkpoints to return.
    #[arg(long = ARG_POINTS, value_name = "count")]
    #[serde(default)]
    pub(crate) points: Option<usize>,
    /// Seed enabling randomised tie-breaking among the best candidates.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Number of leading candidates sampled from at each step (default 3).
    #[arg(long = ARG_SAMPLE_WIDTH, value_name = "count")]
    #[serde(default)]
    pub(crate) sample_width: Option<NonZeroUsize>,
    /// Base URL of the isochrone service.
    #[arg(long = ARG_ISOCHRONE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) isochrone_url: Option<String>,
    /// Routing profile passed to the isochrone service (default `car`).
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Base URL of the geocoding service.
    #[arg(long = ARG_GEOCODER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
}

impl SelectArgs {
    pub(crate) fn into_config(self) -> Result<SelectConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SelectConfig::try_from(merged)
    }
}

/// Resolved `select` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectConfig {
    pub(crate) strategy: String,
    pub(crate) strategies: Utf8PathBuf,
    pub(crate) candidates_db: Utf8PathBuf,
    pub(crate) origin: Origin,
    pub(crate) time_budget: Duration,
    pub(crate) window: IsochroneWindow,
    pub(crate) heading: Option<Heading>,
    pub(crate) points: usize,
    pub(crate) tie_break: TieBreak,
    pub(crate) isochrone: HttpIsochroneProviderConfig,
    pub(crate) geocoder: HttpClientConfig,
}

impl SelectConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.strategies, ARG_STRATEGIES)?;
        require_existing(&self.candidates_db, ARG_CANDIDATES_DB)?;
        Ok(())
    }

    pub(crate) fn request(&self) -> SelectRequest {
        let mut request = SelectRequest::new(
            self.origin.clone(),
            self.strategy.clone(),
            self.time_budget,
            self.points,
        )
        .with_tie_break(self.tie_break);
        request.heading = self.heading;
        request
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match intercept_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl TryFrom<SelectArgs> for SelectConfig {
    type Error = CliError;

    fn try_from(args: SelectArgs) -> Result<Self, Self::Error> {
        let strategy = args.strategy.ok_or(CliError::MissingArgument {
            field: ARG_STRATEGY,
            env: ENV_STRATEGY,
        })?;
        let origin = resolve_origin(args.address, args.lat, args.lon)?;
        let raw_budget = args.time_budget.ok_or(CliError::MissingArgument {
            field: ARG_TIME_BUDGET,
            env: ENV_TIME_BUDGET,
        })?;
        let time_budget = parse_time_budget(&raw_budget)?;
        let points = args.points.ok_or(CliError::MissingArgument {
            field: ARG_POINTS,
            env: ENV_POINTS,
        })?;
        let window = resolve_window(args.window, args.horizon)?;
        let heading = args
            .heading
            .as_deref()
            .map(Heading::parse)
            .transpose()?
            .flatten();
        let tie_break = resolve_tie_break(args.seed, args.sample_width)?;

        let data_dir = args.data_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        let strategies = args
            .strategies
            .unwrap_or_else(|| data_dir.join(DEFAULT_STRATEGIES_FILE));
        let candidates_db = args
            .candidates_db
            .unwrap_or_else(|| data_dir.join(DEFAULT_CANDIDATES_FILE));

        let mut isochrone = HttpIsochroneProviderConfig::new(
            args.isochrone_url
                .unwrap_or_else(|| DEFAULT_ISOCHRONE_URL.to_owned()),
        );
        if let Some(profile) = args.profile {
            isochrone.profile = profile;
        }
        let geocoder = HttpClientConfig::new(
            args.geocoder_url
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_owned()),
        );

        Ok(Self {
            strategy,
            strategies,
            candidates_db,
            origin,
            time_budget,
            window,
            heading,
            points,
            tie_break,
            isochrone,
            geocoder,
        })
    }
}

fn resolve_origin(
    address: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Origin, CliError> {
    match (address, lat, lon) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(CliError::ConflictingOrigin),
        (Some(address), None, None) => Ok(Origin::Address(address)),
        (None, Some(lat), Some(lon)) => {
            if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
                Ok(Origin::Coordinates(Coord { x: lon, y: lat }))
            } else {
                Err(CliError::InvalidCoordinates { lat, lon })
            }
        }
        (None, Some(_), None) => Err(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_LON,
        }),
        (None, None, Some(_)) => Err(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        }),
        (None, None, None) => Err(CliError::MissingArgument {
            field: ARG_ADDRESS,
            env: ENV_ADDRESS,
        }),
    }
}

fn resolve_window(window: Option<u64>, horizon: Option<u64>) -> Result<IsochroneWindow, CliError> {
    let delta = match window {
        Some(0) => return Err(CliError::ZeroWindow),
        Some(seconds) => Duration::from_secs(seconds),
        None => IsochroneWindow::DEFAULT_DELTA,
    };
    let resolved = IsochroneWindow::new(delta);
    Ok(match horizon {
        Some(0) => resolved,
        Some(seconds) => resolved.with_horizon(Duration::from_secs(seconds)),
        None => resolved.with_horizon(IsochroneWindow::DEFAULT_HORIZON),
    })
}

fn resolve_tie_break(
    seed: Option<u64>,
    sample_width: Option<NonZeroUsize>,
) -> Result<TieBreak, CliError> {
    match (seed, sample_width) {
        (Some(seed), width) => Ok(TieBreak::sample_top(
            width.unwrap_or(DEFAULT_SAMPLE_WIDTH),
            seed,
        )),
        (None, Some(_)) => Err(CliError::MissingArgument {
            field: ARG_SEED,
            env: ENV_SEED,
        }),
        (None, None) => Ok(TieBreak::LowestId),
    }
}

/// Parse `HH:MM` or a plain number of seconds.
pub(crate) fn parse_time_budget(raw: &str) -> Result<Duration, CliError> {
    let invalid = || CliError::InvalidTimeBudget {
        value: raw.to_owned(),
    };
    let trimmed = raw.trim();
    let seconds = match trimmed.split_once(':') {
        Some((hours, minutes)) => {
            let hours: u64 = hours.parse().map_err(|_| invalid())?;
            let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
            if minutes >= 60 {
                return Err(invalid());
            }
            hours
                .checked_mul(3_600)
                .and_then(|total| total.checked_add(minutes * 60))
        }
        None => trimmed.parse().ok(),
    };
    seconds.map(Duration::from_secs).ok_or_else(invalid)
}

/// Answers selection requests for the current invocation.
pub(crate) trait PointSelector {
    fn select_points(&self, request: &SelectRequest) -> Result<SelectionOutcome, SelectError>;
}

impl<G, I, S> PointSelector for Interceptor<G, I, S>
where
    G: intercept_core::Geocoder,
    I: intercept_core::IsochroneProvider,
    S: intercept_core::CandidateStore,
{
    fn select_points(&self, request: &SelectRequest) -> Result<SelectionOutcome, SelectError> {
        Self::select_points(self, request)
    }
}

/// Builds the selection engine for the current invocation.
pub(crate) trait SelectorBuilder {
    fn build(&self, config: &SelectConfig) -> Result<Box<dyn PointSelector>, CliError>;
}

pub(crate) struct DefaultSelectorBuilder;

impl SelectorBuilder for DefaultSelectorBuilder {
    #[cfg(feature = "store-sqlite")]
    fn build(&self, config: &SelectConfig) -> Result<Box<dyn PointSelector>, CliError> {
        let strategies = load_strategies(&config.strategies)?;
        let store = intercept_core::SqliteCandidateStore::open(config.candidates_db.as_std_path())
            .map_err(|source| CliError::OpenCandidateStore(Box::new(source)))?;
        let geocoder =
            HttpGeocoder::with_config(&config.geocoder).map_err(|source| CliError::BuildClient {
                service: "geocoder",
                base_url: config.geocoder.base_url.clone(),
                source,
            })?;
        let isochrones =
            HttpIsochroneProvider::with_config(config.isochrone.clone()).map_err(|source| {
                CliError::BuildClient {
                    service: "isochrone",
                    base_url: config.isochrone.http.base_url.clone(),
                    source,
                }
            })?;
        Ok(Box::new(
            Interceptor::new(geocoder, isochrones, store, strategies).with_window(config.window),
        ))
    }

    #[cfg(not(feature = "store-sqlite"))]
    fn build(&self, _config: &SelectConfig) -> Result<Box<dyn PointSelector>, CliError> {
        Err(CliError::MissingFeature {
            feature: "store-sqlite",
            action: "select",
        })
    }
}

/// Load and validate the strategy book at `path`.
pub(crate) fn load_strategies(path: &Utf8Path) -> Result<StrategyBook, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenStrategies {
        path: path.to_path_buf(),
        source,
    })?;
    StrategyBook::from_reader(file).map_err(|source| CliError::LoadStrategies {
        path: path.to_path_buf(),
        source,
    })
}

/// Whether every requested checkpoint was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SelectionStatus {
    Complete,
    Degraded,
}

/// JSON document printed by `intercept select`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SelectResponse {
    /// Checkpoints as `[latitude, longitude]` in pick order.
    pub(crate) points: Vec<[f64; 2]>,
    pub(crate) status: SelectionStatus,
    pub(crate) requested: usize,
}

impl SelectResponse {
    pub(crate) fn from_outcome(outcome: &SelectionOutcome, requested: usize) -> Self {
        let status = match outcome.fulfilment {
            Fulfilment::Complete => SelectionStatus::Complete,
            Fulfilment::Degraded { .. } => SelectionStatus::Degraded,
        };
        Self {
            points: outcome
                .points()
                .into_iter()
                .map(|(lat, lon)| [lat, lon])
                .collect(),
            status,
            requested,
        }
    }
}

pub(super) fn run_select(args: SelectArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_select_with(args, &DefaultSelectorBuilder, &mut stdout)
}

pub(super) fn run_select_with(
    args: SelectArgs,
    builder: &dyn SelectorBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let selector = builder.build(&config)?;
    let outcome = selector.select_points(&config.request())?;
    info!(
        "selected {} of {} points with strategy '{}'",
        outcome.picks.len(),
        config.points,
        config.strategy
    );
    write_select_response(writer, &SelectResponse::from_outcome(&outcome, config.points))
}

fn write_select_response(writer: &mut dyn Write, response: &SelectResponse) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(response).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
