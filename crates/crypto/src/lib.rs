//! `apikit-crypto` — auth-token issuance and verification.
//!
//! A token is a claim set signed as a compact JWS (ES256), then encrypted as
//! a compact JWE (ECDH-ES+A128KW with A256CBC-HS512 content encryption).
//! Verification runs the pipeline in reverse: decrypt, check the signature,
//! validate time-based claims. No key rotation, revocation, or caching.

pub mod error;
pub mod key;
pub mod token;

pub use error::CryptoError;
pub use key::AuthKeys;
pub use token::{IssuedToken, TokenOptions};
