//! Central error dispatch: classify a caught error and build its envelope.

use std::sync::{Arc, RwLock};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use apikit_errors::{ApiError, ErrorCodes, ErrorMap};

use crate::envelope::{ApiResponse, ServerErrorDetail};
use crate::schema::SchemaErrors;

type ErrorCallback = Arc<dyn Fn(ServerErrorDetail) + Send + Sync>;

static CALLBACK: RwLock<Option<ErrorCallback>> = RwLock::new(None);

/// Install the process-wide error-reporting callback. At most one is held;
/// a later call replaces the earlier callback.
pub fn set_error_callback<F>(callback: F)
where
    F: Fn(ServerErrorDetail) + Send + Sync + 'static,
{
    *CALLBACK.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(callback));
}

pub fn clear_error_callback() {
    *CALLBACK.write().unwrap_or_else(|e| e.into_inner()) = None;
}

/// Hand the report to the callback off the response-critical path.
///
/// Absence of a callback, or of a runtime to spawn onto, is tolerated; the
/// client-visible response never waits on this.
fn report_server_error(detail: ServerErrorDetail) {
    let callback = CALLBACK.read().unwrap_or_else(|e| e.into_inner()).clone();
    let Some(callback) = callback else { return };

    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(async move { callback(detail) });
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Envelope for a missing or invalid credential.
pub fn unauthenticated_api_response() -> ApiResponse {
    ApiResponse::new()
        .with_message("Unauthenticated")
        .with_error_code("unauthenticated")
        .with_status(status(ErrorCodes::current().unauthenticated))
}

/// Envelope for one or more field validation errors.
pub fn invalid_api_response(errors: Option<ErrorMap>) -> ApiResponse {
    let mut response = ApiResponse::new();
    if let Some(errors) = errors {
        response = response.with_errors(errors);
    }
    response.with_status(status(ErrorCodes::current().validation))
}

/// Envelope for a single-field validation error.
pub fn invalid_value_api_response(
    field: impl Into<String>,
    message: impl Into<String>,
) -> ApiResponse {
    let mut errors = ErrorMap::new();
    errors.insert(field.into(), vec![message.into()]);
    invalid_api_response(Some(errors))
}

/// Envelope for an unexpected fault; detail is gated by the visibility switch.
pub fn server_error_api_response(error: &anyhow::Error) -> ApiResponse {
    ApiResponse::new()
        .with_server_error(error)
        .with_status(status(ErrorCodes::current().server))
}

/// Single-field validation error for `return Err(...)` sites in user logic.
pub fn invalid_value_error(field: impl Into<String>, message: impl Into<String>) -> anyhow::Error {
    ApiError::invalid_value(field, message).into()
}

/// Route a caught error to the matching envelope.
///
/// Classification in priority order: validation variant, unauthenticated
/// variant, schema violations, everything else. Classification itself never
/// fails; an unrecognized shape falls through to the server-error branch,
/// which also notifies the reporting callback out of band.
pub fn error_api_response(error: anyhow::Error) -> Response {
    let error = match error.downcast::<ApiError>() {
        Ok(ApiError::Validation { code, errors }) => {
            return invalid_api_response(Some(errors))
                .with_status(status(code))
                .into_response();
        }
        Ok(ApiError::Unauthenticated { code }) => {
            return unauthenticated_api_response()
                .with_status(status(code))
                .into_response();
        }
        Ok(server @ ApiError::Server { .. }) => anyhow::Error::from(server),
        Err(error) => error,
    };

    let error = match error.downcast::<SchemaErrors>() {
        Ok(schema_errors) => {
            return invalid_api_response(Some(schema_errors.into_error_map())).into_response();
        }
        Err(error) => error,
    };

    tracing::error!(error = %error, "api handler failed");
    report_server_error(ServerErrorDetail::from_error(&error));
    server_error_api_response(&error).into_response()
}
