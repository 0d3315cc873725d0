//! Focused unit tests covering candidate database preparation.

use camino::Utf8PathBuf;
use rstest::rstest;

use super::helpers::{NODES_JSON, Workspace};
use super::*;
use crate::candidates::{CandidatesArgs, CandidatesConfig};

#[rstest]
fn converting_without_nodes_errors() {
    let err = CandidatesConfig::try_from(CandidatesArgs::default())
        .expect_err("missing nodes should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_NODES);
            assert_eq!(env, ENV_NODES);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn output_defaults_to_candidates_db() {
    let config = CandidatesConfig::try_from(CandidatesArgs {
        nodes: Some(Utf8PathBuf::from("nodes.json")),
        ..CandidatesArgs::default()
    })
    .expect("config should build");
    assert_eq!(config.output, Utf8PathBuf::from("candidates.db"));
    assert_eq!(config.road_classes, None);
}

#[rstest]
fn validate_sources_checks_optional_road_classes() {
    let workspace = Workspace::new();
    let nodes = workspace.write("nodes.json", NODES_JSON);
    let config = CandidatesConfig {
        nodes,
        road_classes: Some(workspace.path("roads.json")),
        output: workspace.path("candidates.db"),
    };
    match config.validate_sources().expect_err("road classes missing") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_ROAD_CLASSES),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_nodes() {
    let workspace = Workspace::new();
    let config = CandidatesConfig {
        nodes: workspace.path("nodes.json"),
        road_classes: None,
        output: workspace.path("candidates.db"),
    };
    match config.validate_sources().expect_err("nodes missing") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_NODES),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}
