//! Process-wide error-code registry.
//!
//! The registry is read by [`crate::ApiError`] constructors, not revalidated
//! at dispatch time: a code changed after an error was constructed does not
//! retroactively change that error's code.

use std::sync::RwLock;

/// Status codes assigned to each error category.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ErrorCodes {
    /// Client input defect.
    pub validation: u16,

    /// Missing or invalid credential.
    pub unauthenticated: u16,

    /// Unexpected fault.
    pub server: u16,
}

impl ErrorCodes {
    pub const DEFAULT: Self = Self {
        validation: 400,
        unauthenticated: 401,
        server: 500,
    };

    /// Snapshot of the registry as it stands right now.
    pub fn current() -> Self {
        *REGISTRY.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ErrorCodes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial update for [`set_error_codes`]. `None` fields keep their prior value.
#[derive(Debug, Default, Copy, Clone)]
pub struct ErrorCodesUpdate {
    pub validation: Option<u16>,
    pub unauthenticated: Option<u16>,
    pub server: Option<u16>,
}

static REGISTRY: RwLock<ErrorCodes> = RwLock::new(ErrorCodes::DEFAULT);

/// Overwrite only the provided codes; unspecified codes retain their values.
///
/// Expected to be called once at startup. The registry is read-mostly and
/// concurrent remapping under live traffic is a caller responsibility.
pub fn set_error_codes(update: ErrorCodesUpdate) {
    let mut codes = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    if let Some(validation) = update.validation {
        codes.validation = validation;
    }
    if let Some(unauthenticated) = update.unauthenticated {
        codes.unauthenticated = unauthenticated;
    }
    if let Some(server) = update.server {
        codes.server = server;
    }
}

/// Restore the 400/401/500 defaults.
pub fn reset_error_codes() {
    *REGISTRY.write().unwrap_or_else(|e| e.into_inner()) = ErrorCodes::DEFAULT;
}
