//! Scenario step tree model
//!
//! A scenario is a tree of statements: sequences, switches over guarded
//! cases, loops, and leaf interactions between objects.

use crate::model::key::Key;
use serde::{Deserialize, Serialize};

/// Scenario statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Statements executed in order
    Sequence { statements: Vec<Step> },
    /// Exactly one matching case runs
    Switch { cases: Vec<StepCase> },
    /// Statements repeated while the condition holds
    Loop {
        condition: String,
        statements: Vec<Step>,
    },
    Leaf(LeafStep),
}

/// Guarded arm of a switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepCase {
    pub condition: String,
    pub statements: Vec<Step>,
}

/// Single interaction in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafStep {
    pub description: String,
    pub from_object: Option<Key>,
    pub to_object: Option<Key>,
    pub action: LeafAction,
}

/// What a leaf step does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "leaf_type", content = "key", rename_all = "snake_case")]
pub enum LeafAction {
    /// Send an event to the target object
    Event(Key),
    /// Ask the target object a query
    Query(Key),
    /// Run another scenario
    Scenario(Key),
    /// Destroy the source object
    Delete,
}

impl Step {
    pub fn sequence(statements: Vec<Step>) -> Self {
        Step::Sequence { statements }
    }

    pub fn leaf(description: impl Into<String>, action: LeafAction) -> Self {
        Step::Leaf(LeafStep {
            description: description.into(),
            from_object: None,
            to_object: None,
            action,
        })
    }

    /// Number of statements in the tree, switch cases included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(step) = stack.pop() {
            count += 1;
            match step {
                Step::Sequence { statements } | Step::Loop { statements, .. } => {
                    stack.extend(statements)
                }
                Step::Switch { cases } => {
                    for case in cases {
                        count += 1;
                        stack.extend(&case.statements);
                    }
                }
                Step::Leaf(_) => {}
            }
        }
        count
    }
}

/// Teardown moves nested statements onto a heap stack so dropping a deep
/// scenario never recurses
impl Drop for Step {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_statements(&mut stack);
        while let Some(mut step) = stack.pop() {
            step.take_statements(&mut stack);
        }
    }
}

impl Step {
    fn take_statements(&mut self, out: &mut Vec<Step>) {
        match self {
            Step::Sequence { statements } | Step::Loop { statements, .. } => out.append(statements),
            Step::Switch { cases } => {
                for case in cases.iter_mut() {
                    out.append(&mut case.statements);
                }
            }
            Step::Leaf(_) => {}
        }
    }
}

impl LeafStep {
    pub fn between(mut self, from: Key, to: Key) -> Self {
        self.from_object = Some(from);
        self.to_object = Some(to);
        self
    }
}
