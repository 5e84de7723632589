//! Flattened scenario step row

use crate::tree::AdjacencyRow;
use serde::{Deserialize, Serialize};

/// Persisted projection of one step statement or switch case
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepRow {
    pub owner_key: String,
    pub node_key: String,
    pub parent_node_key: Option<String>,
    pub sort_order: i64,
    pub step_type: String,
    pub leaf_type: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub from_object_key: Option<String>,
    pub to_object_key: Option<String>,
    pub event_key: Option<String>,
    pub query_key: Option<String>,
    pub scenario_ref_key: Option<String>,
}

impl StepRow {
    /// Row with adjacency columns set and every payload column empty
    pub fn new(
        owner_key: &str,
        node_key: String,
        parent_node_key: Option<String>,
        sort_order: i64,
        step_type: &str,
    ) -> Self {
        Self {
            owner_key: owner_key.to_string(),
            node_key,
            parent_node_key,
            sort_order,
            step_type: step_type.to_string(),
            ..Self::default()
        }
    }
}

impl AdjacencyRow for StepRow {
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
        &self.step_type
    }
}
