//! Engine-level mutating commands.
//!
//! `apply_engine_command` is the single entry point for every operation that
//! writes to the row store. Saving replaces an owner's whole tree; deleting
//! removes every row of the owner.

#![allow(clippy::result_large_err)]

use reqmodel_core::model::{Expression, Step};
use reqmodel_core::{log_op_end, log_op_error, log_op_start};
use reqmodel_store::errors::Result;
use reqmodel_store::migrations::apply_migrations;
use reqmodel_store::repo::hydration;
use rusqlite::Connection;

/// Engine commands that write to the database.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Apply any pending schema migrations.
    Migrate,
    /// Replace the logic expression stored for an owner.
    SaveExpression {
        model_key: String,
        owner_key: String,
        expression: Expression,
    },
    /// Remove the logic expression stored for an owner.
    DeleteExpression { model_key: String, owner_key: String },
    /// Replace the scenario step tree stored for an owner.
    SaveSteps {
        model_key: String,
        owner_key: String,
        steps: Step,
    },
    /// Remove the scenario step tree stored for an owner.
    DeleteSteps { model_key: String, owner_key: String },
}

/// Result of applying an engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommandResult {
    /// Migration ids applied by this call, empty when already current.
    Migrated { applied: Vec<String> },
    /// Tree written; `row_count` rows now represent it.
    Saved { owner_key: String, row_count: usize },
    /// Tree removed; `row_count` rows were deleted (0 when nothing was stored).
    Deleted { owner_key: String, row_count: usize },
}

/// Apply an engine command.
///
/// # Errors
///
/// `Persistence` when SQLite rejects a statement or a recorded migration
/// checksum no longer matches.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
) -> Result<EngineCommandResult> {
    match cmd {
        // ── Migrate ───────────────────────────────────────────────────────────
        EngineCommand::Migrate => {
            log_op_start!("migrate");
            let start = std::time::Instant::now();

            let result = apply_migrations(conn);

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(applied) => {
                    log_op_end!("migrate", duration_ms = elapsed, applied = applied.len())
                }
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!("migrate", e_clone, duration_ms = elapsed);
                }
            }
            result.map(|applied| EngineCommandResult::Migrated { applied })
        }

        // ── SaveExpression ────────────────────────────────────────────────────
        EngineCommand::SaveExpression {
            model_key,
            owner_key,
            expression,
        } => {
            log_op_start!("save_expression", owner_key = %owner_key);
            let start = std::time::Instant::now();

            let result = hydration::save_expression(conn, &model_key, &owner_key, &expression);

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(rows) => log_op_end!("save_expression", duration_ms = elapsed, row_count = *rows),
                Err(e) => {
                    let e_clone = e.clone().with_owner_key(&owner_key);
                    log_op_error!("save_expression", e_clone, duration_ms = elapsed);
                }
            }
            result.map(|row_count| EngineCommandResult::Saved {
                owner_key,
                row_count,
            })
        }

        // ── DeleteExpression ──────────────────────────────────────────────────
        EngineCommand::DeleteExpression {
            model_key,
            owner_key,
        } => {
            log_op_start!("delete_expression", owner_key = %owner_key);
            let start = std::time::Instant::now();

            let result = hydration::delete_expression(conn, &model_key, &owner_key);

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(rows) => {
                    log_op_end!("delete_expression", duration_ms = elapsed, row_count = *rows)
                }
                Err(e) => {
                    let e_clone = e.clone().with_owner_key(&owner_key);
                    log_op_error!("delete_expression", e_clone, duration_ms = elapsed);
                }
            }
            result.map(|row_count| EngineCommandResult::Deleted {
                owner_key,
                row_count,
            })
        }

        // ── SaveSteps ─────────────────────────────────────────────────────────
        EngineCommand::SaveSteps {
            model_key,
            owner_key,
            steps,
        } => {
            log_op_start!("save_steps", owner_key = %owner_key);
            let start = std::time::Instant::now();

            let result = hydration::save_steps(conn, &model_key, &owner_key, &steps);

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(rows) => log_op_end!("save_steps", duration_ms = elapsed, row_count = *rows),
                Err(e) => {
                    let e_clone = e.clone().with_owner_key(&owner_key);
                    log_op_error!("save_steps", e_clone, duration_ms = elapsed);
                }
            }
            result.map(|row_count| EngineCommandResult::Saved {
                owner_key,
                row_count,
            })
        }

        // ── DeleteSteps ───────────────────────────────────────────────────────
        EngineCommand::DeleteSteps {
            model_key,
            owner_key,
        } => {
            log_op_start!("delete_steps", owner_key = %owner_key);
            let start = std::time::Instant::now();

            let result = hydration::delete_steps(conn, &model_key, &owner_key);

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(rows) => log_op_end!("delete_steps", duration_ms = elapsed, row_count = *rows),
                Err(e) => {
                    let e_clone = e.clone().with_owner_key(&owner_key);
                    log_op_error!("delete_steps", e_clone, duration_ms = elapsed);
                }
            }
            result.map(|row_count| EngineCommandResult::Deleted {
                owner_key,
                row_count,
            })
        }
    }
}
