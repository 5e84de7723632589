//! Migration checksums
//!
//! A SHA-256 of the embedded SQL is recorded when a migration is applied and
//! compared on every later run, so an edited migration is caught instead of
//! silently diverging from databases that ran the old text.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the migration SQL
pub fn sql_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}
