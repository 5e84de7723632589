#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::deep_not_chain;
use reqmodel_core::errors::TreeError;
use reqmodel_core::model::{ArithOp, Expression, LeafAction, Step};
use reqmodel_core::{flatten_expression, flatten_steps, rebuild_expression, rebuild_steps};
use std::thread;

const DEPTH: usize = 10_000;

/// Small enough that walking 10 000 levels with native recursion overflows
const STACK_BYTES: usize = 512 * 1024;

fn on_small_stack<F: FnOnce() + Send + 'static>(f: F) {
    thread::Builder::new()
        .stack_size(STACK_BYTES)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

// Derived PartialEq recurses, so deep trees are compared through their rows.

fn nested_sequences(depth: usize) -> Step {
    let mut step = Step::leaf("bottom", LeafAction::Delete);
    for _ in 0..depth {
        step = Step::sequence(vec![step]);
    }
    step
}

#[test]
fn test_deep_expression_chain_round_trips() {
    on_small_stack(|| {
        let expr = deep_not_chain(DEPTH);
        assert_eq!(expr.node_count(), DEPTH + 1);

        let rows = flatten_expression("logic/deep", &expr);
        assert_eq!(rows.len(), DEPTH + 1);

        let rebuilt = rebuild_expression("logic/deep", &rows).unwrap();
        assert_eq!(flatten_expression("logic/deep", &rebuilt), rows);
    });
}

#[test]
fn test_deep_step_nesting_round_trips() {
    on_small_stack(|| {
        let step = nested_sequences(DEPTH);
        let rows = flatten_steps("scenario/deep", &step);
        assert_eq!(rows.len(), DEPTH + 1);

        let rebuilt = rebuild_steps("scenario/deep", &rows).unwrap();
        assert_eq!(flatten_steps("scenario/deep", &rebuilt), rows);
    });
}

#[test]
fn test_deep_trees_drop_without_recursion() {
    on_small_stack(|| {
        let expr = deep_not_chain(DEPTH);
        let rebuilt = rebuild_expression("logic/drop", &flatten_expression("logic/drop", &expr)).unwrap();
        drop(expr);
        drop(rebuilt);

        let step = nested_sequences(DEPTH);
        let rebuilt = rebuild_steps("scenario/drop", &flatten_steps("scenario/drop", &step)).unwrap();
        drop(step);
        drop(rebuilt);
    });
}

#[test]
fn test_deep_operand_under_wrong_arity_root_is_child_arity() {
    on_small_stack(|| {
        let expr = Expression::arith(ArithOp::Add, deep_not_chain(DEPTH), Expression::int(1));
        let mut rows = flatten_expression("logic/broken", &expr);
        // drop the right operand; the deep left chain is rebuilt before the root fails
        let right = rows.pop().unwrap();
        assert_eq!(right.sort_order, 1);
        assert_eq!(right.parent_node_key.as_deref(), Some("logic/broken/expr/0"));

        let err = rebuild_expression("logic/broken", &rows).unwrap_err();
        assert!(
            matches!(err, TreeError::ChildArity { actual: 1, ref node_key, .. } if node_key == "logic/broken/expr/0"),
            "unexpected error: {err:?}"
        );
    });
}

#[test]
fn test_deep_statements_under_leaf_root_is_child_arity() {
    on_small_stack(|| {
        let mut rows = flatten_steps("scenario/broken", &nested_sequences(DEPTH));
        rows[0].step_type = "leaf".to_string();
        rows[0].leaf_type = Some("delete".to_string());

        let err = rebuild_steps("scenario/broken", &rows).unwrap_err();
        assert!(
            matches!(err, TreeError::ChildArity { actual: 1, .. }),
            "unexpected error: {err:?}"
        );
    });
}
