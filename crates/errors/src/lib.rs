//! `apikit-errors` — error-code registry and classified API error type.
//!
//! Plain data carriers shared by the response layer; intentionally decoupled
//! from HTTP and serialization concerns.

pub mod codes;
pub mod error;

pub use codes::{ErrorCodes, ErrorCodesUpdate, reset_error_codes, set_error_codes};
pub use error::{ApiError, ErrorMap};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard};

    static LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests that read or mutate the process-wide code registry.
    pub(crate) fn registry_lock() -> MutexGuard<'static, ()> {
        LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }
}
