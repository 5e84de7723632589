//! Repository layer for persisting tree rows to SQLite
//!
//! `SqliteRepo` moves rows; `hydration` moves whole trees.

mod batch;
pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
