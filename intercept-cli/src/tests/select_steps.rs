//! Behaviour-driven step definitions driving the select CLI scenarios.

use std::cell::RefCell;

use clap::Parser;
use geo::Coord;
use intercept_core::test_support::{DiskIsochroneProvider, StubGeocoder, offset};
use intercept_core::{Candidate, MemoryCandidateStore, StrategyError};
use intercept_selector::{Interceptor, SelectError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;

use super::helpers::{STRATEGIES_JSON, Workspace};
use super::*;
use crate::select::{
    PointSelector, SelectConfig, SelectorBuilder, load_strategies, run_select_with,
};

const ORIGIN: Coord<f64> = Coord { x: 1.44, y: 43.6 };
const ORIGIN_ADDRESS: &str = "Place du Capitole, Toulouse";

/// Wires the engine to in-memory collaborators: disks growing at 1 m/s and
/// candidates laid out around [`ORIGIN`].
struct StubSelectorBuilder {
    candidates: Vec<Candidate>,
}

impl SelectorBuilder for StubSelectorBuilder {
    fn build(&self, config: &SelectConfig) -> Result<Box<dyn PointSelector>, CliError> {
        let strategies = load_strategies(&config.strategies)?;
        let geocoder = StubGeocoder::default().with_address(ORIGIN_ADDRESS, ORIGIN);
        let store = MemoryCandidateStore::new(self.candidates.iter().cloned());
        Ok(Box::new(
            Interceptor::new(geocoder, DiskIsochroneProvider::new(1.0), store, strategies)
                .with_window(config.window),
        ))
    }
}

#[derive(Debug)]
struct SelectWorld {
    workspace: Workspace,
    candidates: RefCell<Vec<Candidate>>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SelectWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            candidates: RefCell::new(Vec::new()),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn push_args(&self, args: &[&str]) {
        self.cli_args
            .borrow_mut()
            .extend(args.iter().map(|arg| (*arg).to_owned()));
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec![
            "intercept".to_owned(),
            "select".to_owned(),
            format!("--{ARG_DATA_DIR}"),
            self.workspace.root().as_str().to_owned(),
            format!("--{ARG_WINDOW}"),
            "1000".to_owned(),
            format!("--{ARG_HORIZON}"),
            "0".to_owned(),
        ];
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn output(&self) -> Value {
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be JSON")
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> SelectWorld {
    SelectWorld::new()
}

#[given("a strategy book and candidate database exist on disk")]
fn data_files_exist(#[from(world)] world: &SelectWorld) {
    world.workspace.write("strategies.json", STRATEGIES_JSON);
    world.workspace.write("candidates.db", "");
}

#[given("six candidates lie between 1000 and 2000 metres from the origin")]
fn ring_candidates(#[from(world)] world: &SelectWorld) {
    let ring = (0..6_u32).map(|i| {
        let bearing = f64::from(i) * 60.0;
        let distance = 1_100.0 + f64::from(i) * 150.0;
        Candidate::new(u64::from(i) + 1, offset(ORIGIN, bearing, distance))
    });
    world.candidates.replace(ring.collect());
}

#[given("I ask for three points with the pursuit strategy after 1000 seconds")]
fn three_pursuit_points(#[from(world)] world: &SelectWorld) {
    world.push_args(&[
        "--strategy",
        "pursuit",
        "--time-budget",
        "1000",
        "--points",
        "3",
    ]);
}

#[given("I ask for ten points with the pursuit strategy after 1000 seconds")]
fn ten_pursuit_points(#[from(world)] world: &SelectWorld) {
    world.push_args(&[
        "--strategy",
        "pursuit",
        "--time-budget",
        "1000",
        "--points",
        "10",
    ]);
}

#[given("I ask for three points with an unknown strategy after 1000 seconds")]
fn unknown_strategy(#[from(world)] world: &SelectWorld) {
    world.push_args(&[
        "--strategy",
        "ambush",
        "--time-budget",
        "1000",
        "--points",
        "3",
    ]);
}

#[given("I ask for three points with the pursuit strategy without a time budget")]
fn no_time_budget(#[from(world)] world: &SelectWorld) {
    world.push_args(&["--strategy", "pursuit", "--points", "3"]);
}

#[given("the origin is given as coordinates")]
fn origin_coordinates(#[from(world)] world: &SelectWorld) {
    let lat = ORIGIN.y.to_string();
    let lon = ORIGIN.x.to_string();
    world.push_args(&["--lat", &lat, "--lon", &lon]);
}

#[given("the origin is given as an address")]
fn origin_address(#[from(world)] world: &SelectWorld) {
    world.push_args(&["--address", ORIGIN_ADDRESS]);
}

#[when("I run the select command")]
fn run_select_command(#[from(world)] world: &SelectWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Select(args) => {
            let builder = StubSelectorBuilder {
                candidates: world.candidates.borrow().clone(),
            };
            let mut buffer = world.stdout.borrow_mut();
            run_select_with(args, &builder, &mut *buffer)
        }
        Command::Candidates(_) => panic!("expected select command"),
    });
    world.result.replace(Some(outcome));
}

#[then("the command prints three complete points nearest the origin first")]
fn three_complete_points(#[from(world)] world: &SelectWorld) {
    let borrowed = world.result.borrow();
    borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");

    let output = world.output();
    assert_eq!(output["status"], "complete");
    assert_eq!(output["requested"], 3);
    let points = output["points"].as_array().expect("points array");
    assert_eq!(points.len(), 3);
    let nearest = offset(ORIGIN, 0.0, 1_100.0);
    let first = points.first().expect("first point");
    let lat = first.get(0).and_then(Value::as_f64).expect("latitude");
    let lon = first.get(1).and_then(Value::as_f64).expect("longitude");
    assert!((lat - nearest.y).abs() < 1e-9);
    assert!((lon - nearest.x).abs() < 1e-9);
}

#[then("the command prints six points marked as degraded")]
fn degraded_points(#[from(world)] world: &SelectWorld) {
    let output = world.output();
    assert_eq!(output["status"], "degraded");
    assert_eq!(output["requested"], 10);
    assert_eq!(output["points"].as_array().expect("points array").len(), 6);
}

#[then("the command fails because the strategy is unknown")]
fn fails_unknown_strategy(#[from(world)] world: &SelectWorld) {
    match &*world.error() {
        CliError::Select(SelectError::Strategy(StrategyError::UnknownStrategy(name))) => {
            assert_eq!(name, "ambush");
        }
        other => panic!("expected an unknown strategy, found {other:?}"),
    }
}

#[then("the command fails because the time budget is missing")]
fn fails_missing_budget(#[from(world)] world: &SelectWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_TIME_BUDGET);
            assert_eq!(*env, ENV_TIME_BUDGET);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
    assert!(world.stdout.borrow().is_empty());
}

macro_rules! register_select_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/select_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SelectWorld) {
            let _ = world;
        }
    };
}

register_select_scenario!(select_from_coordinates, "selecting points from coordinates");
register_select_scenario!(select_from_address, "selecting points from an address");
register_select_scenario!(select_degraded, "reporting a partially fulfilled request");
register_select_scenario!(select_unknown_strategy, "rejecting an unknown strategy");
register_select_scenario!(select_missing_budget, "rejecting a missing time budget");
