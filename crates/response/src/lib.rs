//! `apikit-response` — response envelope, error dispatch, and handler wrapper.
//!
//! The pieces compose into one pipeline: [`handler::async_handler`] invokes
//! user logic, wraps successful values in an [`envelope::ApiResponse`], and
//! hands failures to [`dispatch::error_api_response`], which classifies the
//! error and builds the matching envelope. Nothing escapes the wrapper
//! uncaught.

pub mod dispatch;
pub mod envelope;
pub mod errors_value;
pub mod handler;
pub mod schema;

pub use dispatch::{
    clear_error_callback, error_api_response, invalid_api_response, invalid_value_api_response,
    invalid_value_error, server_error_api_response, set_error_callback,
    unauthenticated_api_response,
};
pub use envelope::{ApiResponse, ServerErrorDetail, show_server_errors};
pub use errors_value::ErrorsValue;
pub use handler::{HandlerOutcome, async_handler};
pub use schema::{SchemaErrors, SchemaIssue};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard};

    static LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests that touch the process-wide switches (server-error
    /// visibility, reporting callback) or assert on their effects.
    pub(crate) fn global_state_lock() -> MutexGuard<'static, ()> {
        LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }
}
