//! Hydration layer - trees in, trees out
//!
//! Bridges the in-memory tree models and the row store: saving flattens and
//! replaces an owner's rows in one transaction, loading reads rows back and
//! rebuilds the tree.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::SqliteRepo;
use reqmodel_core::errors::{ExError, Result as TreeResult};
use reqmodel_core::model::{Expression, Step};
use reqmodel_core::{
    flatten_expression, flatten_steps, rebuild_expression, rebuild_expressions,
    rebuild_step_trees, rebuild_steps,
};
use rusqlite::Connection;
use std::collections::BTreeMap;

// ===== Expressions =====

/// Replace the stored expression of `owner_key` with `expr`
///
/// Returns the number of rows written.
pub fn save_expression(
    conn: &mut Connection,
    model_key: &str,
    owner_key: &str,
    expr: &Expression,
) -> Result<usize> {
    let rows = flatten_expression(owner_key, expr);
    let tx = conn.transaction().map_err(from_rusqlite)?;
    SqliteRepo::delete_expression_rows(&tx, model_key, owner_key)?;
    let written = SqliteRepo::insert_expression_rows(&tx, model_key, &rows)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(written)
}

/// Load the expression of one owner
///
/// An owner without rows is `NotFound`; corrupted rows are `MalformedTree`
/// or `KeyParse`.
pub fn load_expression(conn: &Connection, model_key: &str, owner_key: &str) -> Result<Expression> {
    let rows = SqliteRepo::query_owner_expression_rows(conn, model_key, owner_key)?;
    rebuild_expression(owner_key, &rows)
        .map_err(|e| ExError::from(e).with_op("load_expression"))
}

/// Load every expression of a model, each owner rebuilt independently
pub fn load_all_expressions(
    conn: &Connection,
    model_key: &str,
) -> Result<BTreeMap<String, TreeResult<Expression>>> {
    let rows = SqliteRepo::query_expression_rows(conn, model_key)?;
    Ok(rebuild_expressions(&rows))
}

/// Remove the stored expression of `owner_key`; returns the rows removed
pub fn delete_expression(conn: &mut Connection, model_key: &str, owner_key: &str) -> Result<usize> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let removed = SqliteRepo::delete_expression_rows(&tx, model_key, owner_key)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(removed)
}

// ===== Steps =====

/// Replace the stored step tree of `owner_key` with `step`
pub fn save_steps(conn: &mut Connection, model_key: &str, owner_key: &str, step: &Step) -> Result<usize> {
    let rows = flatten_steps(owner_key, step);
    let tx = conn.transaction().map_err(from_rusqlite)?;
    SqliteRepo::delete_step_rows(&tx, model_key, owner_key)?;
    let written = SqliteRepo::insert_step_rows(&tx, model_key, &rows)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(written)
}

/// Load the step tree of one owner
pub fn load_steps(conn: &Connection, model_key: &str, owner_key: &str) -> Result<Step> {
    let rows = SqliteRepo::query_owner_step_rows(conn, model_key, owner_key)?;
    rebuild_steps(owner_key, &rows).map_err(|e| ExError::from(e).with_op("load_steps"))
}

/// Load every step tree of a model, each owner rebuilt independently
pub fn load_all_steps(conn: &Connection, model_key: &str) -> Result<BTreeMap<String, TreeResult<Step>>> {
    let rows = SqliteRepo::query_step_rows(conn, model_key)?;
    Ok(rebuild_step_trees(&rows))
}

/// Remove the stored step tree of `owner_key`; returns the rows removed
pub fn delete_steps(conn: &mut Connection, model_key: &str, owner_key: &str) -> Result<usize> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let removed = SqliteRepo::delete_step_rows(&tx, model_key, owner_key)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(removed)
}
