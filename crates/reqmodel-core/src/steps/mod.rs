//! Scenario step family: flat row shape, flattener and rebuilder

mod columns;
pub mod flatten;
pub mod rebuild;
pub mod row;

pub use flatten::{flatten_steps, NODE_KEY_FAMILY};
pub use rebuild::{rebuild_step_trees, rebuild_steps};
pub use row::StepRow;
