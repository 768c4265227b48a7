//! Serializable response envelope.

use std::backtrace::BacktraceStatus;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use apikit_errors::ErrorMap;

static SHOW_SERVER_ERRORS: AtomicBool = AtomicBool::new(true);

/// Global switch controlling whether server-error diagnostics are attached to
/// response bodies. On by default; turn off in production-facing deployments.
pub fn show_server_errors(show: bool) {
    SHOW_SERVER_ERRORS.store(show, Ordering::Relaxed);
}

pub(crate) fn server_errors_shown() -> bool {
    SHOW_SERVER_ERRORS.load(Ordering::Relaxed)
}

/// Diagnostic detail for an unexpected fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerErrorDetail {
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ServerErrorDetail {
    /// Best-effort extraction from an arbitrary caught error.
    ///
    /// `stack` is populated only when a backtrace was captured (RUST_BACKTRACE).
    pub fn from_error(error: &anyhow::Error) -> Self {
        let name = if error.downcast_ref::<apikit_errors::ApiError>().is_some() {
            "ApiError"
        } else {
            "Error"
        };

        let backtrace = error.backtrace();
        let stack = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };

        Self {
            name: name.to_string(),
            message: error.to_string(),
            stack,
        }
    }

    fn into_value(self) -> Value {
        let mut detail = Map::new();
        detail.insert("name".into(), Value::String(self.name));
        detail.insert("message".into(), Value::String(self.message));
        if let Some(stack) = self.stack {
            detail.insert("stack".into(), Value::String(stack));
        }
        Value::Object(detail)
    }
}

/// Response envelope sent to the client.
///
/// Built through chainable `with_` setters, each overwriting the prior value
/// for its field (`errors` replaces wholesale, never merges). The terminal
/// send is the [`IntoResponse`] impl; it consumes the envelope, so a second
/// send is unrepresentable.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    data: Option<Value>,
    message: Option<String>,
    error: Option<String>,
    errors: Option<ErrorMap>,
    error_code: Option<String>,
    server_error: Option<ServerErrorDetail>,
    additional: Map<String, Value>,
}

impl Default for ApiResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            data: None,
            message: None,
            error: None,
            errors: None,
            error_code: None,
            server_error: None,
            additional: Map::new(),
        }
    }
}

impl ApiResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_errors(mut self, errors: ErrorMap) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    /// Attach `{name, message, stack}` diagnostics for an unexpected fault.
    ///
    /// A no-op while [`show_server_errors`] is off, regardless of call count.
    pub fn with_server_error(mut self, error: &anyhow::Error) -> Self {
        if server_errors_shown() {
            self.server_error = Some(ServerErrorDetail::from_error(error));
        }
        self
    }

    /// Extra top-level keys merged under the named fields (named fields win
    /// on collision).
    pub fn with_additional(mut self, additional: Map<String, Value>) -> Self {
        self.additional = additional;
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Finalize into the status and JSON body that will be sent.
    ///
    /// If `errors` is non-empty and `error` was not explicitly set, `error`
    /// becomes the first message of the first key in insertion order.
    pub fn into_body(mut self) -> (StatusCode, Map<String, Value>) {
        if self.error.is_none() {
            if let Some(errors) = &self.errors {
                self.error = errors
                    .first()
                    .and_then(|(_, messages)| messages.first())
                    .cloned();
            }
        }

        let mut body = self.additional;
        if let Some(data) = self.data {
            body.insert("data".into(), data);
        }
        if let Some(message) = self.message {
            body.insert("message".into(), Value::String(message));
        }
        if let Some(errors) = self.errors {
            let errors = errors
                .into_iter()
                .map(|(field, messages)| {
                    let messages = messages.into_iter().map(Value::String).collect();
                    (field, Value::Array(messages))
                })
                .collect::<Map<String, Value>>();
            body.insert("errors".into(), Value::Object(errors));
        }
        if let Some(error) = self.error {
            body.insert("error".into(), Value::String(error));
        }
        if let Some(error_code) = self.error_code {
            body.insert("errorCode".into(), Value::String(error_code));
        }
        if let Some(server_error) = self.server_error {
            body.insert("serverError".into(), server_error.into_value());
        }

        (self.status, body)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let (status, body) = self.into_body();
        (status, Json(Value::Object(body))).into_response()
    }
}
