#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::case_expression;
use reqmodel_core::errors::{ExError, ExErrorKind, TreeError};
use reqmodel_core::model::{ArithOp, Expression};
use reqmodel_core::{flatten_expression, rebuild_expression, rebuild_expressions, ExpressionRow};

#[test]
fn scenario_01_single_int_literal() {
    let expr = Expression::int(7);
    let rows = flatten_expression("logic/1", &expr);

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.owner_key, "logic/1");
    assert_eq!(row.node_kind, "int_literal");
    assert_eq!(row.int_value, Some(7));
    assert_eq!(row.parent_node_key, None);
    assert_eq!(row.sort_order, 0);

    assert_eq!(rebuild_expression("logic/1", &rows).unwrap(), expr);
}

#[test]
fn scenario_02_addition_rebuilds_from_reversed_rows() {
    let expr = Expression::arith(ArithOp::Add, Expression::int(1), Expression::int(2));
    let rows = flatten_expression("logic/2", &expr);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].node_kind, "binary_arith");
    assert_eq!(rows[0].operator.as_deref(), Some("+"));
    assert_eq!((rows[1].sort_order, rows[1].int_value), (0, Some(1)));
    assert_eq!((rows[2].sort_order, rows[2].int_value), (1, Some(2)));

    let reversed: Vec<ExpressionRow> = rows.into_iter().rev().collect();
    assert_eq!(rebuild_expression("logic/2", &reversed).unwrap(), expr);
}

#[test]
fn scenario_03_case_with_otherwise() {
    let expr = case_expression(true);
    let rows = flatten_expression("logic/3", &expr);

    let root = &rows[0];
    assert_eq!(root.node_kind, "case");
    assert_eq!(root.negated, Some(true));

    let children: Vec<&ExpressionRow> = rows
        .iter()
        .filter(|r| r.parent_node_key.as_deref() == Some(root.node_key.as_str()))
        .collect();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].node_kind, "case_branch");
    assert_eq!(children[0].sort_order, 0);
    assert_eq!(children[1].node_kind, "case_branch");
    assert_eq!(children[1].sort_order, 1);
    assert_eq!(children[2].node_kind, "int_literal");
    assert_eq!(children[2].sort_order, 2);

    assert_eq!(rebuild_expression("logic/3", &rows).unwrap(), expr);
}

#[test]
fn scenario_03b_case_without_otherwise() {
    let expr = case_expression(false);
    let rows = flatten_expression("logic/3", &expr);
    assert_eq!(rows[0].negated, Some(false));
    let root_children = rows
        .iter()
        .filter(|r| r.parent_node_key.as_deref() == Some(rows[0].node_key.as_str()))
        .count();
    assert_eq!(root_children, 2);
    assert_eq!(rebuild_expression("logic/3", &rows).unwrap(), expr);
}

#[test]
fn scenario_04_two_roots_fail_only_that_owner() {
    let mut rows = flatten_expression("logic/bad", &Expression::int(1));
    let mut second_root = flatten_expression("logic/bad", &Expression::int(2));
    second_root[0].node_key = "logic/bad/expr/extra".to_string();
    rows.extend(second_root);
    rows.extend(flatten_expression("logic/good", &Expression::bool(true)));

    let results = rebuild_expressions(&rows);
    assert_eq!(results.len(), 2);

    let err = results["logic/bad"].clone().unwrap_err();
    assert_eq!(
        err,
        TreeError::RootCount {
            owner_key: "logic/bad".to_string(),
            count: 2
        }
    );
    assert_eq!(err.to_string(), "2 root rows for owner logic/bad, expected 1");

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::MalformedTree);
    assert_eq!(ex.owner_key(), Some("logic/bad"));

    assert_eq!(results["logic/good"].clone().unwrap(), Expression::bool(true));
}
