//! Expression family: flat row shape, flattener and rebuilder

mod columns;
pub mod flatten;
pub mod rebuild;
pub mod row;

pub use flatten::{flatten_expression, NODE_KEY_FAMILY};
pub use rebuild::{rebuild_expression, rebuild_expressions};
pub use row::ExpressionRow;
