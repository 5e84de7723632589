#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{checkout_scenario, scramble};
use reqmodel_core::model::{LeafAction, Step};
use reqmodel_core::{flatten_steps, rebuild_step_trees, rebuild_steps};

#[test]
fn test_checkout_scenario_round_trips() {
    let scenario = checkout_scenario();
    let rows = flatten_steps("scenario/checkout", &scenario);
    assert_eq!(rows.len(), scenario.node_count());
    assert_eq!(rebuild_steps("scenario/checkout", &rows).unwrap(), scenario);
}

#[test]
fn test_scrambled_rows_round_trip() {
    let scenario = checkout_scenario();
    let rows = scramble(&flatten_steps("scenario/checkout", &scenario));
    assert_eq!(rebuild_steps("scenario/checkout", &rows).unwrap(), scenario);
}

#[test]
fn test_single_leaf_root() {
    let step = Step::leaf("remove", LeafAction::Delete);
    let rows = flatten_steps("scenario/s", &step);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].leaf_type.as_deref(), Some("delete"));
    assert_eq!(rebuild_steps("scenario/s", &rows).unwrap(), step);
}

#[test]
fn test_empty_sequence_root() {
    let step = Step::sequence(vec![]);
    let rows = flatten_steps("scenario/s", &step);
    assert_eq!(rows.len(), 1);
    assert_eq!(rebuild_steps("scenario/s", &rows).unwrap(), step);
}

#[test]
fn test_two_scenarios_rebuild_independently() {
    let a = checkout_scenario();
    let b = Step::leaf("remove", LeafAction::Delete);
    let mut rows = flatten_steps("scenario/a", &a);
    rows.extend(flatten_steps("scenario/b", &b));

    let mut by_owner = rebuild_step_trees(&rows);
    assert_eq!(by_owner.len(), 2);
    assert_eq!(by_owner.remove("scenario/a").unwrap().unwrap(), a);
    assert_eq!(by_owner.remove("scenario/b").unwrap().unwrap(), b);
}
