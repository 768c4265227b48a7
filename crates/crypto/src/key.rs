//! Key material for the token pipeline.

use josekit::jwe::ECDH_ES_A128KW;
use josekit::jwe::alg::ecdh_es::{EcdhEsJweDecrypter, EcdhEsJweEncrypter};
use josekit::jwk::alg::ec::{EcCurve, EcKeyPair};
use josekit::jws::ES256;
use josekit::jws::alg::ecdsa::{EcdsaJwsSigner, EcdsaJwsVerifier};
use josekit::jwk::KeyPair as _;

use crate::error::CryptoError;

const JWT_PRIVATE_KEY: &str = "JWT_PRIVATE_KEY";
const JWT_PUBLIC_KEY: &str = "JWT_PUBLIC_KEY";
const JWE_PRIVATE_KEY: &str = "JWE_PRIVATE_KEY";
const JWE_PUBLIC_KEY: &str = "JWE_PUBLIC_KEY";

/// The four key handles the token pipeline needs: sign/verify for the inner
/// JWS, encrypt/decrypt for the outer JWE.
///
/// Key material is passed at construction; nothing here reads the process
/// environment except [`AuthKeys::from_env`].
pub struct AuthKeys {
    pub(crate) jwt_signer: EcdsaJwsSigner,
    pub(crate) jwt_verifier: EcdsaJwsVerifier,
    pub(crate) jwe_encrypter: EcdhEsJweEncrypter,
    pub(crate) jwe_decrypter: EcdhEsJweDecrypter,
}

impl AuthKeys {
    /// Build from PEM-encoded keys: P-256 private/public for signing, and
    /// P-256 private/public for encryption.
    pub fn from_pems(
        jwt_private_pem: impl AsRef<[u8]>,
        jwt_public_pem: impl AsRef<[u8]>,
        jwe_private_pem: impl AsRef<[u8]>,
        jwe_public_pem: impl AsRef<[u8]>,
    ) -> Result<Self, CryptoError> {
        Ok(Self {
            jwt_signer: ES256
                .signer_from_pem(jwt_private_pem)
                .map_err(CryptoError::Key)?,
            jwt_verifier: ES256
                .verifier_from_pem(jwt_public_pem)
                .map_err(CryptoError::Key)?,
            jwe_encrypter: ECDH_ES_A128KW
                .encrypter_from_pem(jwe_public_pem)
                .map_err(CryptoError::Key)?,
            jwe_decrypter: ECDH_ES_A128KW
                .decrypter_from_pem(jwe_private_pem)
                .map_err(CryptoError::Key)?,
        })
    }

    /// Load PEM keys from `JWT_PRIVATE_KEY` / `JWT_PUBLIC_KEY` /
    /// `JWE_PRIVATE_KEY` / `JWE_PUBLIC_KEY`.
    pub fn from_env() -> Result<Self, CryptoError> {
        let jwt_private = require_env(JWT_PRIVATE_KEY)?;
        let jwt_public = require_env(JWT_PUBLIC_KEY)?;
        let jwe_private = require_env(JWE_PRIVATE_KEY)?;
        let jwe_public = require_env(JWE_PUBLIC_KEY)?;

        Self::from_pems(jwt_private, jwt_public, jwe_private, jwe_public)
    }

    /// Fresh ephemeral P-256 pairs, for development and tests.
    pub fn generate() -> Result<Self, CryptoError> {
        let jwt_pair = EcKeyPair::generate(EcCurve::P256).map_err(CryptoError::Key)?;
        let jwe_pair = EcKeyPair::generate(EcCurve::P256).map_err(CryptoError::Key)?;

        Self::from_pems(
            jwt_pair.to_pem_private_key(),
            jwt_pair.to_pem_public_key(),
            jwe_pair.to_pem_private_key(),
            jwe_pair.to_pem_public_key(),
        )
    }
}

fn require_env(name: &'static str) -> Result<String, CryptoError> {
    std::env::var(name).map_err(|_| CryptoError::MissingKey(name))
}
