//! SQLite row-store adapter for flattened trees
//!
//! Persists expression and step rows as-is. The adapter knows nothing about
//! tree shape beyond writing rows in the order given, which must be parent
//! first for the self-referential foreign key.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::batch::insert_rows;
use reqmodel_core::{ExpressionRow, StepRow};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, Transaction};

const EXPRESSION_TABLE: &str = "logic_expression_node";
const STEP_TABLE: &str = "scenario_step_node";

const EXPRESSION_COLUMNS: [&str; 21] = [
    "model_key",
    "owner_key",
    "node_key",
    "parent_node_key",
    "sort_order",
    "node_kind",
    "bool_value",
    "int_value",
    "numerator",
    "denominator",
    "string_value",
    "operator",
    "attribute_key",
    "action_key",
    "global_function_key",
    "builtin_module",
    "builtin_function",
    "quantifier_kind",
    "variable_name",
    "set_constant_kind",
    "negated",
];

const STEP_COLUMNS: [&str; 14] = [
    "model_key",
    "owner_key",
    "node_key",
    "parent_node_key",
    "sort_order",
    "step_type",
    "leaf_type",
    "condition",
    "description",
    "from_object_key",
    "to_object_key",
    "event_key",
    "query_key",
    "scenario_ref_key",
];

/// SQLite repository for tree rows
pub struct SqliteRepo;

impl SqliteRepo {
    // ===== Expression rows =====

    /// Insert expression rows in the order given
    pub fn insert_expression_rows(
        tx: &Transaction<'_>,
        model_key: &str,
        rows: &[ExpressionRow],
    ) -> Result<usize> {
        let values = rows
            .iter()
            .map(|r| {
                vec![
                    Value::from(model_key.to_string()),
                    Value::from(r.owner_key.clone()),
                    Value::from(r.node_key.clone()),
                    Value::from(r.parent_node_key.clone()),
                    Value::from(r.sort_order),
                    Value::from(r.node_kind.clone()),
                    Value::from(r.bool_value),
                    Value::from(r.int_value),
                    Value::from(r.numerator),
                    Value::from(r.denominator),
                    Value::from(r.string_value.clone()),
                    Value::from(r.operator.clone()),
                    Value::from(r.attribute_key.clone()),
                    Value::from(r.action_key.clone()),
                    Value::from(r.global_function_key.clone()),
                    Value::from(r.builtin_module.clone()),
                    Value::from(r.builtin_function.clone()),
                    Value::from(r.quantifier_kind.clone()),
                    Value::from(r.variable_name.clone()),
                    Value::from(r.set_constant_kind.clone()),
                    Value::from(r.negated),
                ]
            })
            .collect();

        insert_rows(tx, EXPRESSION_TABLE, &EXPRESSION_COLUMNS, values)
    }

    /// Delete every expression row of one owner; returns the rows removed
    pub fn delete_expression_rows(
        tx: &Transaction<'_>,
        model_key: &str,
        owner_key: &str,
    ) -> Result<usize> {
        delete_owner(tx, EXPRESSION_TABLE, model_key, owner_key)
    }

    /// All expression rows of a model
    pub fn query_expression_rows(conn: &Connection, model_key: &str) -> Result<Vec<ExpressionRow>> {
        query_rows(conn, EXPRESSION_TABLE, &EXPRESSION_COLUMNS, model_key, None, expression_row)
    }

    /// Expression rows of a single owner
    pub fn query_owner_expression_rows(
        conn: &Connection,
        model_key: &str,
        owner_key: &str,
    ) -> Result<Vec<ExpressionRow>> {
        query_rows(
            conn,
            EXPRESSION_TABLE,
            &EXPRESSION_COLUMNS,
            model_key,
            Some(owner_key),
            expression_row,
        )
    }

    // ===== Step rows =====

    /// Insert step rows in the order given
    pub fn insert_step_rows(tx: &Transaction<'_>, model_key: &str, rows: &[StepRow]) -> Result<usize> {
        let values = rows
            .iter()
            .map(|r| {
                vec![
                    Value::from(model_key.to_string()),
                    Value::from(r.owner_key.clone()),
                    Value::from(r.node_key.clone()),
                    Value::from(r.parent_node_key.clone()),
                    Value::from(r.sort_order),
                    Value::from(r.step_type.clone()),
                    Value::from(r.leaf_type.clone()),
                    Value::from(r.condition.clone()),
                    Value::from(r.description.clone()),
                    Value::from(r.from_object_key.clone()),
                    Value::from(r.to_object_key.clone()),
                    Value::from(r.event_key.clone()),
                    Value::from(r.query_key.clone()),
                    Value::from(r.scenario_ref_key.clone()),
                ]
            })
            .collect();

        insert_rows(tx, STEP_TABLE, &STEP_COLUMNS, values)
    }

    /// Delete every step row of one owner; returns the rows removed
    pub fn delete_step_rows(tx: &Transaction<'_>, model_key: &str, owner_key: &str) -> Result<usize> {
        delete_owner(tx, STEP_TABLE, model_key, owner_key)
    }

    /// All step rows of a model
    pub fn query_step_rows(conn: &Connection, model_key: &str) -> Result<Vec<StepRow>> {
        query_rows(conn, STEP_TABLE, &STEP_COLUMNS, model_key, None, step_row)
    }

    /// Step rows of a single owner
    pub fn query_owner_step_rows(
        conn: &Connection,
        model_key: &str,
        owner_key: &str,
    ) -> Result<Vec<StepRow>> {
        query_rows(conn, STEP_TABLE, &STEP_COLUMNS, model_key, Some(owner_key), step_row)
    }

    // ===== Owners =====

    /// Distinct owners holding expression rows in a model
    pub fn list_expression_owners(conn: &Connection, model_key: &str) -> Result<Vec<String>> {
        list_owners(conn, EXPRESSION_TABLE, model_key)
    }

    /// Distinct owners holding step rows in a model
    pub fn list_step_owners(conn: &Connection, model_key: &str) -> Result<Vec<String>> {
        list_owners(conn, STEP_TABLE, model_key)
    }
}

/// Count then delete, since rows removed by the parent cascade are not
/// reported by `changes()`
fn delete_owner(tx: &Transaction<'_>, table: &str, model_key: &str, owner_key: &str) -> Result<usize> {
    let count: i64 = tx
        .query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE model_key = ?1 AND owner_key = ?2"),
            [model_key, owner_key],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;

    tx.execute(
        &format!("DELETE FROM {table} WHERE model_key = ?1 AND owner_key = ?2"),
        [model_key, owner_key],
    )
    .map_err(from_rusqlite)?;

    Ok(usize::try_from(count).unwrap_or_default())
}

fn query_rows<T>(
    conn: &Connection,
    table: &str,
    columns: &[&str],
    model_key: &str,
    owner_key: Option<&str>,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    // model_key is the first column and is not part of the row structs
    let select = columns[1..].join(", ");
    let filter = if owner_key.is_some() {
        "model_key = ?1 AND owner_key = ?2"
    } else {
        "model_key = ?1"
    };
    let sql = format!(
        "SELECT {select} FROM {table} WHERE {filter}
         ORDER BY owner_key, parent_node_key, sort_order"
    );

    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = match owner_key {
        Some(owner_key) => stmt.query_map([model_key, owner_key], map),
        None => stmt.query_map([model_key], map),
    }
    .map_err(from_rusqlite)?
    .collect::<std::result::Result<Vec<_>, _>>()
    .map_err(from_rusqlite)?;

    tracing::debug!(
        table = table,
        model_key = %model_key,
        row_count = rows.len(),
        "Queried tree rows"
    );

    Ok(rows)
}

fn list_owners(conn: &Connection, table: &str, model_key: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT DISTINCT owner_key FROM {table} WHERE model_key = ?1 ORDER BY owner_key"
        ))
        .map_err(from_rusqlite)?;
    let owners = stmt
        .query_map([model_key], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(owners)
}

fn expression_row(row: &Row<'_>) -> rusqlite::Result<ExpressionRow> {
    Ok(ExpressionRow {
        owner_key: row.get(0)?,
        node_key: row.get(1)?,
        parent_node_key: row.get(2)?,
        sort_order: row.get(3)?,
        node_kind: row.get(4)?,
        bool_value: row.get(5)?,
        int_value: row.get(6)?,
        numerator: row.get(7)?,
        denominator: row.get(8)?,
        string_value: row.get(9)?,
        operator: row.get(10)?,
        attribute_key: row.get(11)?,
        action_key: row.get(12)?,
        global_function_key: row.get(13)?,
        builtin_module: row.get(14)?,
        builtin_function: row.get(15)?,
        quantifier_kind: row.get(16)?,
        variable_name: row.get(17)?,
        set_constant_kind: row.get(18)?,
        negated: row.get(19)?,
    })
}

fn step_row(row: &Row<'_>) -> rusqlite::Result<StepRow> {
    Ok(StepRow {
        owner_key: row.get(0)?,
        node_key: row.get(1)?,
        parent_node_key: row.get(2)?,
        sort_order: row.get(3)?,
        step_type: row.get(4)?,
        leaf_type: row.get(5)?,
        condition: row.get(6)?,
        description: row.get(7)?,
        from_object_key: row.get(8)?,
        to_object_key: row.get(9)?,
        event_key: row.get(10)?,
        query_key: row.get(11)?,
        scenario_ref_key: row.get(12)?,
    })
}
