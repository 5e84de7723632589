//! Multi-row insert batching

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Transaction};

/// Rows per INSERT statement
///
/// The widest row binds 21 parameters, so a full batch stays well below
/// SQLite's default limit of 32766 bound parameters.
pub(crate) const ROWS_PER_INSERT: usize = 500;

/// Insert pre-encoded rows into `table`, batching several rows per statement
///
/// Batches are executed in order, so rows written parent-first stay
/// parent-first across statement boundaries. Returns the number of rows
/// inserted.
pub(crate) fn insert_rows(
    tx: &Transaction<'_>,
    table: &str,
    columns: &[&str],
    rows: Vec<Vec<Value>>,
) -> Result<usize> {
    let mut inserted = 0;
    let row_placeholders = format!("({})", vec!["?"; columns.len()].join(", "));
    let column_list = columns.join(", ");

    for chunk in rows.chunks(ROWS_PER_INSERT) {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            table,
            column_list,
            vec![row_placeholders.as_str(); chunk.len()].join(", ")
        );
        inserted += tx
            .execute(&sql, params_from_iter(chunk.iter().flatten()))
            .map_err(from_rusqlite)?;
    }

    Ok(inserted)
}
