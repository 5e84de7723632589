//! reqmodel engine - orchestration layer
//!
//! Coordinates the tree codecs in `reqmodel-core` with the row store in
//! `reqmodel-store`. Every command and query logs its operation boundary.

pub mod commands;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
