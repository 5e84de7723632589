//! Command orchestration layer.
//!
//! Mutating commands take `&mut Connection`; read-only queries take a shared
//! connection and never write.

pub mod engine_command;
pub mod engine_query;
