//! ReqModel Core - Tree models and their flat adjacency-list form
//!
//! This crate provides the in-memory side of requirements-model persistence:
//! - Structured model keys (`domain/d1/class/c1/...`)
//! - Logic expression trees and scenario step trees
//! - Deterministic flattening of a tree into parent-first rows
//! - Validating reconstruction of trees from unordered rows, per owner
//! - Error and logging facilities shared by the store, engine and CLI
//!
//! Nothing here touches storage; see `reqmodel-store` for the SQLite adapter.

pub mod errors;
pub mod expression;
pub mod logging_facility;
pub mod model;
pub mod steps;
pub mod tree;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, TreeError};
pub use expression::{flatten_expression, rebuild_expression, rebuild_expressions, ExpressionRow};
pub use model::{Expression, Key, KeyType, Step};
pub use steps::{flatten_steps, rebuild_step_trees, rebuild_steps, StepRow};
