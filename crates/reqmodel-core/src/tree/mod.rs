//! Flat adjacency-list plumbing shared by the expression and step families
//!
//! Both families flatten an in-memory tree into rows carrying a synthetic
//! node key, an optional parent key and a sibling sort order, and rebuild
//! the tree from an unordered bag of such rows.

pub mod adjacency;
pub mod checks;
pub mod node_key;

pub use adjacency::{group_by_owner, rebuild_each, rebuild_owner, AdjacencyRow, OwnerIndex};
pub use node_key::NodeKeyMinter;
