//! Behavioural tests for static feature derivation.

use std::cell::RefCell;

use intercept_core::{Candidate, FeatureId};
use intercept_data::{NodeRecord, RoadClassTable, RoadSegment};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct DerivationWorld {
    node: RefCell<Option<NodeRecord>>,
    table: RefCell<Option<RoadClassTable>>,
    candidate: RefCell<Option<Candidate>>,
}

#[fixture]
fn world() -> DerivationWorld {
    DerivationWorld::default()
}

fn node(segments: Vec<RoadSegment>) -> NodeRecord {
    NodeRecord {
        id: 7,
        lon: 0.585,
        lat: 43.646,
        segments,
    }
}

fn feature(world: &DerivationWorld, feature: FeatureId) -> f64 {
    world
        .candidate
        .borrow()
        .as_ref()
        .expect("candidate derived")
        .feature(feature)
        .expect("feature present")
}

#[given("a node joining a two-lane primary road and an untagged residential street")]
fn given_junction(world: &DerivationWorld) {
    world.node.replace(Some(node(vec![
        RoadSegment::new("primary").with_lanes("2"),
        RoadSegment::new("residential"),
    ])));
}

#[given("an isolated node")]
fn given_isolated(world: &DerivationWorld) {
    world.node.replace(Some(node(Vec::new())));
}

#[given("the built-in road class table")]
fn given_built_in(world: &DerivationWorld) {
    world.table.replace(Some(RoadClassTable::default()));
}

#[given("a road class table limiting residential streets to 30 km/h")]
fn given_custom_table(world: &DerivationWorld) {
    let table = RoadClassTable::from_json_str(r#"{"classes": {"residential": 30}}"#)
        .expect("valid table");
    world.table.replace(Some(table));
}

#[when("I derive the node's candidate")]
fn when_derive(world: &DerivationWorld) {
    let node = world.node.borrow();
    let table = world.table.borrow();
    let candidate = node
        .as_ref()
        .expect("node configured")
        .to_candidate(table.as_ref().expect("table configured"));
    world.candidate.replace(Some(candidate));
}

#[then("the candidate has 2 streets")]
fn then_two_streets(world: &DerivationWorld) {
    assert_eq!(feature(world, FeatureId::StreetCount), 2.0);
}

#[then("the candidate has 0 streets")]
fn then_no_streets(world: &DerivationWorld) {
    assert_eq!(feature(world, FeatureId::StreetCount), 0.0);
}

#[then("its speeds range from 50 to 80 km/h")]
fn then_default_speeds(world: &DerivationWorld) {
    assert_eq!(feature(world, FeatureId::SpeedMin), 50.0);
    assert_eq!(feature(world, FeatureId::SpeedMax), 80.0);
    assert_eq!(feature(world, FeatureId::SpeedAvg), 65.0);
}

#[then("its speeds range from 30 to 80 km/h")]
fn then_custom_speeds(world: &DerivationWorld) {
    assert_eq!(feature(world, FeatureId::SpeedMin), 30.0);
    assert_eq!(feature(world, FeatureId::SpeedMax), 80.0);
}

#[then("its speeds range from 0 to 0 km/h")]
fn then_zero_speeds(world: &DerivationWorld) {
    assert_eq!(feature(world, FeatureId::SpeedMin), 0.0);
    assert_eq!(feature(world, FeatureId::SpeedMax), 0.0);
    assert_eq!(feature(world, FeatureId::LanesAvg), 0.0);
}

#[then("its average lane count is 1.5")]
fn then_lanes(world: &DerivationWorld) {
    assert_eq!(feature(world, FeatureId::LanesAvg), 1.5);
}

#[scenario(path = "tests/features/static_features.feature", index = 0)]
fn built_in_fallbacks(world: DerivationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/static_features.feature", index = 1)]
fn configured_fallbacks(world: DerivationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/static_features.feature", index = 2)]
fn isolated_node(world: DerivationWorld) {
    let _ = world;
}
