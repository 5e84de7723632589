use thiserror::Error;

/// Result type alias using TreeError
pub type Result<T> = std::result::Result<T, TreeError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error surfaced by the tree persistence layer is classified into one
/// of these kinds. Each kind maps to a stable error code so callers can
/// branch on `NotFound` (an expected outcome for optional lookups) without
/// matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup
    NotFound,

    // Corrupted or buggy stored data (never retried)
    MalformedTree,
    KeyParse,

    // Caller input
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::MalformedTree => "ERR_MALFORMED_TREE",
            ExErrorKind::KeyParse => "ERR_KEY_PARSE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an error of this kind points at corrupted stored data
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, ExErrorKind::MalformedTree | ExErrorKind::KeyParse)
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the owner and
/// node keys of the offending tree so corrupted rows can be located.
#[derive(Debug, Clone, PartialEq)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    owner_key: Option<String>,
    node_key: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            owner_key: None,
            node_key: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add owner key context
    pub fn with_owner_key(mut self, owner_key: impl Into<String>) -> Self {
        self.owner_key = Some(owner_key.into());
        self
    }

    /// Add node key context
    pub fn with_node_key(mut self, node_key: impl Into<String>) -> Self {
        self.node_key = Some(node_key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the owner key context, if any
    pub fn owner_key(&self) -> Option<&str> {
        self.owner_key.as_deref()
    }

    /// Get the node key context, if any
    pub fn node_key(&self) -> Option<&str> {
        self.node_key.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(owner_key) = &self.owner_key {
            write!(f, " (owner_key: {})", owner_key)?;
        }
        if let Some(node_key) = &self.node_key {
            write!(f, " (node_key: {})", node_key)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for flattening and rebuilding trees
///
/// Every variant raised while rebuilding names the owner whose rows are at
/// fault, and the node where the problem was detected when there is one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    // ===== Lookup =====
    /// No rows exist for the requested owner
    #[error("No tree rows found for owner {owner_key}")]
    OwnerNotFound { owner_key: String },

    // ===== Structural Errors =====
    /// Owner has zero or several parentless rows
    #[error("{count} root rows for owner {owner_key}, expected 1")]
    RootCount { owner_key: String, count: usize },

    /// Two rows of one owner share a node key
    #[error("Duplicate node key {node_key} in owner {owner_key}")]
    DuplicateNodeKey { owner_key: String, node_key: String },

    /// Row points at a parent that is not part of the owner's rows
    #[error("Node {node_key} in owner {owner_key} references missing parent {parent_node_key}")]
    DanglingParent {
        owner_key: String,
        node_key: String,
        parent_node_key: String,
    },

    /// Row cannot be reached by walking down from the owner's root
    #[error("Node {node_key} in owner {owner_key} is not reachable from the root")]
    UnreachableNode { owner_key: String, node_key: String },

    /// Two siblings share a sort order
    #[error("Children of node {parent_node_key} in owner {owner_key} share sort order {sort_order}")]
    DuplicateSortOrder {
        owner_key: String,
        parent_node_key: String,
        sort_order: i64,
    },

    // ===== Node Errors =====
    /// Stored kind discriminator is not in the catalog
    #[error("Unknown node kind '{kind}' at node {node_key} in owner {owner_key}")]
    UnknownNodeKind {
        owner_key: String,
        node_key: String,
        kind: String,
    },

    /// Fixed-arity kind has the wrong number of children
    #[error("Node {node_key} ({kind}) in owner {owner_key} has {actual} children, expected {expected}")]
    ChildArity {
        owner_key: String,
        node_key: String,
        kind: String,
        expected: String,
        actual: usize,
    },

    /// Node appears under a parent that cannot hold it
    #[error("Node {node_key} ({kind}) in owner {owner_key} is misplaced: {reason}")]
    MisplacedNode {
        owner_key: String,
        node_key: String,
        kind: String,
        reason: String,
    },

    /// Scalar payload column is missing or holds an unrecognised value
    #[error("Invalid {column} at node {node_key} in owner {owner_key}: {reason}")]
    InvalidPayload {
        owner_key: String,
        node_key: String,
        column: String,
        reason: String,
    },

    // ===== Key Errors =====
    /// Reference column holds a key string that does not parse
    #[error("Cannot parse {column} '{value}' at node {node_key} in owner {owner_key}: {reason}")]
    KeyParse {
        owner_key: String,
        node_key: String,
        column: String,
        value: String,
        reason: String,
    },

    /// Key string does not parse (no row context)
    #[error("Invalid key '{value}': {reason}")]
    InvalidKey { value: String, reason: String },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TreeError {
    /// Owner key the error is attributed to, if any
    pub fn owner_key(&self) -> Option<&str> {
        match self {
            TreeError::OwnerNotFound { owner_key }
            | TreeError::RootCount { owner_key, .. }
            | TreeError::DuplicateNodeKey { owner_key, .. }
            | TreeError::DanglingParent { owner_key, .. }
            | TreeError::UnreachableNode { owner_key, .. }
            | TreeError::DuplicateSortOrder { owner_key, .. }
            | TreeError::UnknownNodeKind { owner_key, .. }
            | TreeError::ChildArity { owner_key, .. }
            | TreeError::MisplacedNode { owner_key, .. }
            | TreeError::InvalidPayload { owner_key, .. }
            | TreeError::KeyParse { owner_key, .. } => Some(owner_key),
            TreeError::InvalidKey { .. } | TreeError::Internal { .. } => None,
        }
    }

    /// Node key the error is attributed to, if any
    pub fn node_key(&self) -> Option<&str> {
        match self {
            TreeError::DuplicateNodeKey { node_key, .. }
            | TreeError::DanglingParent { node_key, .. }
            | TreeError::UnreachableNode { node_key, .. }
            | TreeError::UnknownNodeKind { node_key, .. }
            | TreeError::ChildArity { node_key, .. }
            | TreeError::MisplacedNode { node_key, .. }
            | TreeError::InvalidPayload { node_key, .. }
            | TreeError::KeyParse { node_key, .. } => Some(node_key),
            TreeError::DuplicateSortOrder {
                parent_node_key, ..
            } => Some(parent_node_key),
            TreeError::OwnerNotFound { .. }
            | TreeError::RootCount { .. }
            | TreeError::InvalidKey { .. }
            | TreeError::Internal { .. } => None,
        }
    }

    fn ex_kind(&self) -> ExErrorKind {
        match self {
            TreeError::OwnerNotFound { .. } => ExErrorKind::NotFound,
            TreeError::RootCount { .. }
            | TreeError::DuplicateNodeKey { .. }
            | TreeError::DanglingParent { .. }
            | TreeError::UnreachableNode { .. }
            | TreeError::DuplicateSortOrder { .. }
            | TreeError::UnknownNodeKind { .. }
            | TreeError::ChildArity { .. }
            | TreeError::MisplacedNode { .. }
            | TreeError::InvalidPayload { .. } => ExErrorKind::MalformedTree,
            TreeError::KeyParse { .. } | TreeError::InvalidKey { .. } => ExErrorKind::KeyParse,
            TreeError::Internal { .. } => ExErrorKind::Internal,
        }
    }
}

/// Conversion from TreeError to ExError
///
/// Keeps the owner and node keys as structured fields and the rendered
/// variant as the message.
impl From<TreeError> for ExError {
    fn from(err: TreeError) -> Self {
        let mut ex = ExError::new(err.ex_kind()).with_message(err.to_string());
        if let Some(owner_key) = err.owner_key() {
            ex = ex.with_owner_key(owner_key);
        }
        if let Some(node_key) = err.node_key() {
            ex = ex.with_node_key(node_key);
        }
        ex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_count_message() {
        let err = TreeError::RootCount {
            owner_key: "logic/1".to_string(),
            count: 2,
        };
        assert_eq!(err.to_string(), "2 root rows for owner logic/1, expected 1");
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::MalformedTree)
            .with_op("rebuild")
            .with_owner_key("logic/1")
            .with_node_key("logic/1/expr/3")
            .with_message("bad arity");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_MALFORMED_TREE]"));
        assert!(rendered.contains("rebuild"));
        assert!(rendered.contains("logic/1/expr/3"));
    }

    #[test]
    fn test_integrity_kinds() {
        assert!(ExErrorKind::MalformedTree.is_data_integrity());
        assert!(ExErrorKind::KeyParse.is_data_integrity());
        assert!(!ExErrorKind::NotFound.is_data_integrity());
    }
}
