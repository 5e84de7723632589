//! ReqModel Store - SQLite persistence for flattened trees
//!
//! Provides:
//! - Connection helpers with the pragmas tree storage relies on
//! - Embedded, checksummed schema migrations
//! - Row-store adapter for expression and step rows
//! - Hydration helpers that save and load whole trees per owner

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteRepo;
