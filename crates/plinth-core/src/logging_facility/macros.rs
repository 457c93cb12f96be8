//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use plinth_core::log_op_start;
/// log_op_start!("lookup_value_create");
/// log_op_start!("lookup_value_create", lookup_list_name = "vehicle_make");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = plinth_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = plinth_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use plinth_core::log_op_end;
/// log_op_end!("lookup_value_create", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = plinth_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = plinth_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use plinth_core::{log_op_error, errors::PlinthError};
/// # use plinth_core::model::EntityId;
/// let err = PlinthError::LookupValueNotFound { entity_id: EntityId::new(1) };
/// log_op_error!("lookup_value_read", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let plinth_err: $crate::errors::PlinthError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = plinth_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = plinth_err.kind_name(),
            err.code = plinth_err.code().unwrap_or("none"),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let plinth_err: $crate::errors::PlinthError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = plinth_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = plinth_err.kind_name(),
            err.code = plinth_err.code().unwrap_or("none"),
            $($field)*
        );
    }};
}
