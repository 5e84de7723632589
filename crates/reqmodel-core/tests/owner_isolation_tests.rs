#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{case_expression, checkout_scenario, every_kind_expressions, scramble};
use reqmodel_core::errors::TreeError;
use reqmodel_core::model::{LeafAction, Step};
use reqmodel_core::{flatten_expression, flatten_steps, rebuild_expressions, rebuild_step_trees};

#[test]
fn test_interleaved_owners_rebuild_independently() {
    let exprs = every_kind_expressions();
    let mut rows = Vec::new();
    for (i, expr) in exprs.iter().enumerate() {
        rows.extend(flatten_expression(&format!("logic/o{i:02}"), expr));
    }
    let rows = scramble(&rows);

    let results = rebuild_expressions(&rows);
    assert_eq!(results.len(), exprs.len());
    for (i, expr) in exprs.iter().enumerate() {
        let rebuilt = results[&format!("logic/o{i:02}")].as_ref().unwrap();
        assert_eq!(rebuilt, expr);
    }
}

#[test]
fn test_corrupt_owner_does_not_affect_others() {
    let good = case_expression(true);
    let mut rows = flatten_expression("logic/a", &good);
    let mut bad = flatten_expression("logic/b", &case_expression(true));
    bad.retain(|r| r.node_kind != "case_branch" || r.sort_order != 0);
    rows.extend(bad);
    rows.extend(flatten_expression("logic/c", &good));

    let results = rebuild_expressions(&rows);
    assert_eq!(results["logic/a"].as_ref().unwrap(), &good);
    assert_eq!(results["logic/c"].as_ref().unwrap(), &good);
    assert!(matches!(
        results["logic/b"],
        Err(TreeError::DanglingParent { ref owner_key, .. }) if owner_key == "logic/b"
    ));
}

#[test]
fn test_results_are_ordered_by_owner() {
    let mut rows = flatten_steps("scenario/z", &checkout_scenario());
    rows.extend(flatten_steps("scenario/a", &Step::leaf("x", LeafAction::Delete)));
    rows.extend(flatten_steps("scenario/m", &Step::sequence(vec![])));

    let owners: Vec<String> = rebuild_step_trees(&rows).into_keys().collect();
    assert_eq!(owners, vec!["scenario/a", "scenario/m", "scenario/z"]);
}

#[test]
fn test_no_rows_no_owners() {
    assert!(rebuild_expressions(&[]).is_empty());
    assert!(rebuild_step_trees(&[]).is_empty());
}
