//! Unit tests covering feature-flag behaviour.

#![cfg(not(feature = "store-sqlite"))]

use rstest::rstest;

use super::helpers::{NODES_JSON, Workspace};
use super::*;
use crate::candidates::{CandidatesArgs, build_candidates};

#[rstest]
fn candidates_require_store_sqlite() {
    let workspace = Workspace::new();
    let args = CandidatesArgs {
        nodes: Some(workspace.write("nodes.json", NODES_JSON)),
        road_classes: None,
        output: Some(workspace.path("candidates.db")),
    };
    match build_candidates(args).expect_err("missing feature should error") {
        CliError::MissingFeature { feature, action } => {
            assert_eq!(feature, "store-sqlite");
            assert_eq!(action, "candidates");
        }
        other => panic!("expected MissingFeature, found {other:?}"),
    }
}
