//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Tree identifiers
pub const FIELD_MODEL_KEY: &str = "model_key";
pub const FIELD_OWNER_KEY: &str = "owner_key";
pub const FIELD_NODE_KEY: &str = "node_key";

// Collection sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_OWNER_COUNT: &str = "owner_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
