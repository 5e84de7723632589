//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operation
//! boundaries. Call sites need `tracing` and `reqmodel-core-types` as
//! dependencies.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use reqmodel_core::log_op_start;
/// log_op_start!("save_expression");
/// log_op_start!("save_expression", owner_key = "logic/1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = reqmodel_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = reqmodel_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use reqmodel_core::log_op_end;
/// log_op_end!("save_expression", duration_ms = 3, row_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = reqmodel_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = reqmodel_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into `ExError`; the owner and node keys of
/// tree errors are recorded as fields.
///
/// # Example
///
/// ```ignore
/// # use reqmodel_core::{log_op_error, errors::TreeError};
/// let err = TreeError::OwnerNotFound { owner_key: "logic/1".to_string() };
/// log_op_error!("load_expression", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = reqmodel_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            owner_key = ex_err.owner_key().unwrap_or_default(),
            node_key = ex_err.node_key().unwrap_or_default(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = reqmodel_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            owner_key = ex_err.owner_key().unwrap_or_default(),
            node_key = ex_err.node_key().unwrap_or_default(),
            $($field)*
        );
    }};
}
