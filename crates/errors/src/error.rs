//! Classified API error variants.

use indexmap::IndexMap;
use thiserror::Error;

use crate::codes::ErrorCodes;

/// Field name → messages, in insertion order.
///
/// Insertion order is load-bearing: the response layer derives its top-level
/// `error` string from the first message of the first key.
pub type ErrorMap = IndexMap<String, Vec<String>>;

/// A classified error carrying a status code and optional structured detail.
///
/// Variants capture their status code from the registry at construction time.
/// Construction never fails; these are plain data carriers with no side
/// effects, consumed once by the response dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Client input failed validation.
    #[error("validation failed")]
    Validation { code: u16, errors: ErrorMap },

    /// Missing or invalid credential.
    #[error("unauthenticated")]
    Unauthenticated { code: u16 },

    /// Unexpected fault. The underlying cause travels separately through the
    /// dispatch path, not through this variant.
    #[error("{message}")]
    Server { code: u16, message: String },
}

impl ApiError {
    pub fn validation(errors: ErrorMap) -> Self {
        Self::Validation {
            code: ErrorCodes::current().validation,
            errors,
        }
    }

    /// Validation error for exactly one field: detail is `{field: [message]}`.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ErrorMap::new();
        errors.insert(field.into(), vec![message.into()]);
        Self::validation(errors)
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthenticated {
            code: ErrorCodes::current().unauthenticated,
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            code: ErrorCodes::current().server,
            message: message.into(),
        }
    }

    /// Status code captured when this error was constructed.
    pub fn code(&self) -> u16 {
        match self {
            Self::Validation { code, .. }
            | Self::Unauthenticated { code }
            | Self::Server { code, .. } => *code,
        }
    }

    /// Structured field-error detail, if this variant carries any.
    pub fn error_detail(&self) -> Option<&ErrorMap> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            Self::Unauthenticated { .. } | Self::Server { .. } => None,
        }
    }
}
