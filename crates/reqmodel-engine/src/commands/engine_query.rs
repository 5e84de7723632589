//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for queries that rebuild
//! trees from stored rows. Unlike `apply_engine_command`, it accepts a shared
//! connection and never writes to the database.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;

use reqmodel_core::errors::{ExError, ExErrorKind};
use reqmodel_core::model::{Expression, Step};
use reqmodel_core::{log_op_end, log_op_error, log_op_start};
use reqmodel_store::errors::Result;
use reqmodel_store::repo::hydration;
use rusqlite::Connection;

/// Read-only queries over stored trees.
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// Rebuild one owner's logic expression.
    GetExpression { model_key: String, owner_key: String },
    /// Rebuild every logic expression of a model.
    ListExpressions { model_key: String },
    /// Rebuild one owner's scenario step tree.
    GetSteps { model_key: String, owner_key: String },
    /// Rebuild every scenario step tree of a model.
    ListSteps { model_key: String },
}

/// Outcome of rebuilding one owner during a list query.
///
/// A failed owner never hides the others.
pub type OwnerOutcomes<T> = BTreeMap<String, std::result::Result<T, ExError>>;

/// Result of an engine query.
#[derive(Debug, Clone)]
pub enum EngineQueryResult {
    Expression(Box<Expression>),
    Expressions(OwnerOutcomes<Expression>),
    Steps(Box<Step>),
    StepTrees(OwnerOutcomes<Step>),
}

/// Apply a read-only engine query.
///
/// # Errors
///
/// - `NotFound` when a get names an owner with no stored rows.
/// - `MalformedTree` or `KeyParse` when the stored rows of that owner are
///   corrupt.
/// - `Persistence` when the rows cannot be read.
///
/// List queries only fail on persistence errors; per-owner failures are
/// reported inside the result map.
pub fn apply_engine_query(query: EngineQuery, conn: &Connection) -> Result<EngineQueryResult> {
    match query {
        // ── GetExpression ─────────────────────────────────────────────────────
        EngineQuery::GetExpression {
            model_key,
            owner_key,
        } => {
            log_op_start!("get_expression", owner_key = %owner_key);
            let start = std::time::Instant::now();

            let result = hydration::load_expression(conn, &model_key, &owner_key)
                .map(|expr| EngineQueryResult::Expression(Box::new(expr)));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => log_op_end!("get_expression", duration_ms = elapsed),
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!("get_expression", e_clone, duration_ms = elapsed);
                }
            }
            result
        }

        // ── ListExpressions ───────────────────────────────────────────────────
        EngineQuery::ListExpressions { model_key } => {
            log_op_start!("list_expressions", model_key = %model_key);
            let start = std::time::Instant::now();

            let result = hydration::load_all_expressions(conn, &model_key)
                .map(|trees| outcomes(trees, "list_expressions"));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(owners) => log_op_end!(
                    "list_expressions",
                    duration_ms = elapsed,
                    owner_count = owners.len(),
                    failed_count = failed(owners)
                ),
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!("list_expressions", e_clone, duration_ms = elapsed);
                }
            }
            result.map(EngineQueryResult::Expressions)
        }

        // ── GetSteps ──────────────────────────────────────────────────────────
        EngineQuery::GetSteps {
            model_key,
            owner_key,
        } => {
            log_op_start!("get_steps", owner_key = %owner_key);
            let start = std::time::Instant::now();

            let result = hydration::load_steps(conn, &model_key, &owner_key)
                .map(|step| EngineQueryResult::Steps(Box::new(step)));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => log_op_end!("get_steps", duration_ms = elapsed),
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!("get_steps", e_clone, duration_ms = elapsed);
                }
            }
            result
        }

        // ── ListSteps ─────────────────────────────────────────────────────────
        EngineQuery::ListSteps { model_key } => {
            log_op_start!("list_steps", model_key = %model_key);
            let start = std::time::Instant::now();

            let result = hydration::load_all_steps(conn, &model_key)
                .map(|trees| outcomes(trees, "list_steps"));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(owners) => log_op_end!(
                    "list_steps",
                    duration_ms = elapsed,
                    owner_count = owners.len(),
                    failed_count = failed(owners)
                ),
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!("list_steps", e_clone, duration_ms = elapsed);
                }
            }
            result.map(EngineQueryResult::StepTrees)
        }
    }
}

fn outcomes<T>(
    trees: BTreeMap<String, reqmodel_core::Result<T>>,
    op: &str,
) -> OwnerOutcomes<T> {
    trees
        .into_iter()
        .map(|(owner_key, tree)| {
            let outcome = tree.map_err(|e| {
                let ex = ExError::from(e).with_op(op);
                if ex.kind().is_data_integrity() {
                    tracing::warn!(
                        op = op,
                        owner_key = %owner_key,
                        err_code = ex.code(),
                        "Stored tree failed to rebuild"
                    );
                }
                ex
            });
            (owner_key, outcome)
        })
        .collect()
}

fn failed<T>(owners: &OwnerOutcomes<T>) -> usize {
    owners.values().filter(|o| o.is_err()).count()
}

/// True when `err` means the owner simply has nothing stored
pub fn is_not_found(err: &ExError) -> bool {
    err.kind() == ExErrorKind::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::engine_command::{apply_engine_command, EngineCommand};
    use reqmodel_store::db;

    fn migrated() -> Connection {
        let mut conn = db::open_ready_in_memory().unwrap();
        apply_engine_command(EngineCommand::Migrate, &mut conn).unwrap();
        conn
    }

    #[test]
    fn test_get_missing_expression_is_not_found() {
        let conn = migrated();
        let err = apply_engine_query(
            EngineQuery::GetExpression {
                model_key: "m".to_string(),
                owner_key: "logic/absent".to_string(),
            },
            &conn,
        )
        .unwrap_err();
        assert!(is_not_found(&err));
        assert_eq!(err.owner_key(), Some("logic/absent"));
    }

    #[test]
    fn test_list_reports_each_owner() {
        let mut conn = migrated();
        for owner in ["logic/a", "logic/b"] {
            apply_engine_command(
                EngineCommand::SaveExpression {
                    model_key: "m".to_string(),
                    owner_key: owner.to_string(),
                    expression: Expression::int(1),
                },
                &mut conn,
            )
            .unwrap();
        }

        let result = apply_engine_query(
            EngineQuery::ListExpressions {
                model_key: "m".to_string(),
            },
            &conn,
        )
        .unwrap();
        let EngineQueryResult::Expressions(owners) = result else {
            panic!("expected expressions");
        };
        assert_eq!(owners.len(), 2);
        assert!(owners.values().all(|o| o.as_ref() == Ok(&Expression::int(1))));
    }
}
