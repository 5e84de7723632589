//! Row-level checks shared by the rebuilders
//!
//! Each helper turns a problem found at one row into a [`TreeError`] that
//! names the row's owner, node key and kind.

use super::adjacency::AdjacencyRow;
use crate::errors::{Result, TreeError};
use crate::model::{Key, KeyType};

/// Child count does not match what the kind allows
pub fn child_arity<R: AdjacencyRow>(row: &R, expected: impl Into<String>, actual: usize) -> TreeError {
    TreeError::ChildArity {
        owner_key: row.owner_key().to_string(),
        node_key: row.node_key().to_string(),
        kind: row.kind_label().to_string(),
        expected: expected.into(),
        actual,
    }
}

/// Fail unless the row has exactly `expected` children
pub fn expect_arity<R: AdjacencyRow>(row: &R, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(child_arity(row, expected.to_string(), actual))
    }
}

/// Row sits under a parent that cannot hold it
pub fn misplaced<R: AdjacencyRow>(row: &R, reason: impl Into<String>) -> TreeError {
    TreeError::MisplacedNode {
        owner_key: row.owner_key().to_string(),
        node_key: row.node_key().to_string(),
        kind: row.kind_label().to_string(),
        reason: reason.into(),
    }
}

pub fn unknown_kind<R: AdjacencyRow>(row: &R) -> TreeError {
    TreeError::UnknownNodeKind {
        owner_key: row.owner_key().to_string(),
        node_key: row.node_key().to_string(),
        kind: row.kind_label().to_string(),
    }
}

pub fn invalid_payload<R: AdjacencyRow>(row: &R, column: &str, reason: impl Into<String>) -> TreeError {
    TreeError::InvalidPayload {
        owner_key: row.owner_key().to_string(),
        node_key: row.node_key().to_string(),
        column: column.to_string(),
        reason: reason.into(),
    }
}

/// Value of a payload column the kind cannot do without
pub fn required<'v, R: AdjacencyRow>(row: &R, column: &str, value: Option<&'v str>) -> Result<&'v str> {
    value.ok_or_else(|| invalid_payload(row, column, "required column is empty"))
}

/// Parse a required reference column into a key of the given type
pub fn required_key<R: AdjacencyRow>(
    row: &R,
    column: &str,
    value: Option<&str>,
    expected: KeyType,
) -> Result<Key> {
    let value = required(row, column, value)?;
    parse_key(row, column, value, expected)
}

/// Parse an optional reference column
pub fn optional_key<R: AdjacencyRow>(
    row: &R,
    column: &str,
    value: Option<&str>,
    expected: KeyType,
) -> Result<Option<Key>> {
    value
        .map(|v| parse_key(row, column, v, expected))
        .transpose()
}

fn parse_key<R: AdjacencyRow>(row: &R, column: &str, value: &str, expected: KeyType) -> Result<Key> {
    Key::parse_as(value, expected).map_err(|err| {
        let reason = match err {
            TreeError::InvalidKey { reason, .. } => reason,
            other => other.to_string(),
        };
        TreeError::KeyParse {
            owner_key: row.owner_key().to_string(),
            node_key: row.node_key().to_string(),
            column: column.to_string(),
            value: value.to_string(),
            reason,
        }
    })
}
