//! Flattened expression row

use crate::tree::AdjacencyRow;
use serde::{Deserialize, Serialize};

/// Persisted projection of one expression node
///
/// Only the payload columns relevant to `node_kind` are populated; see
/// [`super::columns`] for which column each kind uses, including the two
/// columns that are reused for cross-cutting metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpressionRow {
    pub owner_key: String,
    pub node_key: String,
    pub parent_node_key: Option<String>,
    pub sort_order: i64,
    pub node_kind: String,
    pub bool_value: Option<bool>,
    pub int_value: Option<i64>,
    pub numerator: Option<i64>,
    pub denominator: Option<i64>,
    pub string_value: Option<String>,
    pub operator: Option<String>,
    pub attribute_key: Option<String>,
    pub action_key: Option<String>,
    pub global_function_key: Option<String>,
    pub builtin_module: Option<String>,
    pub builtin_function: Option<String>,
    pub quantifier_kind: Option<String>,
    pub variable_name: Option<String>,
    pub set_constant_kind: Option<String>,
    pub negated: Option<bool>,
}

impl ExpressionRow {
    /// Row with adjacency columns set and every payload column empty
    pub fn new(
        owner_key: &str,
        node_key: String,
        parent_node_key: Option<String>,
        sort_order: i64,
        node_kind: &str,
    ) -> Self {
        Self {
            owner_key: owner_key.to_string(),
            node_key,
            parent_node_key,
            sort_order,
            node_kind: node_kind.to_string(),
            ..Self::default()
        }
    }
}

impl AdjacencyRow for ExpressionRow {
    fn owner_key(&self) -> &str {
        &self.owner_key
    }

    fn node_key(&self) -> &str {
        &self.node_key
    }

    fn parent_node_key(&self) -> Option<&str> {
        self.parent_node_key.as_deref()
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn kind_label(&self) -> &str {
        &self.node_kind
    }
}
