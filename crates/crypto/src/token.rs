//! Token issuance and verification.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use josekit::jwe::{self, JweHeader};
use josekit::jws::JwsHeader;
use josekit::jwt::{self, JwtPayload, JwtPayloadValidator};
use uuid::Uuid;

use crate::error::CryptoError;
use crate::key::AuthKeys;

/// An issued auth token and the identifier to persist alongside it.
///
/// `db_token` is the token's `jti`; storing it lets a session row be matched
/// to the token later without storing the token itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub db_token: String,
}

/// Optional claims for [`AuthKeys::issue_with`].
#[derive(Debug, Default, Clone)]
pub struct TokenOptions {
    pub issuer: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthKeys {
    /// Issue a token for `subject`: claims `{jti, sub, iat}`, signed then
    /// encrypted.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, CryptoError> {
        self.issue_with(subject, TokenOptions::default())
    }

    pub fn issue_with(
        &self,
        subject: &str,
        options: TokenOptions,
    ) -> Result<IssuedToken, CryptoError> {
        let jti = Uuid::new_v4().to_string();

        let mut payload = JwtPayload::new();
        payload.set_jwt_id(&jti);
        payload.set_subject(subject);
        payload.set_issued_at(&SystemTime::now());
        if let Some(issuer) = &options.issuer {
            payload.set_issuer(issuer);
        }
        if let Some(expires_at) = options.expires_at {
            payload.set_expires_at(&expires_at.into());
        }

        let mut jws_header = JwsHeader::new();
        jws_header.set_token_type("JWT");
        let jws = jwt::encode_with_signer(&payload, &jws_header, &self.jwt_signer)
            .map_err(CryptoError::Token)?;

        let mut jwe_header = JweHeader::new();
        jwe_header.set_content_encryption("A256CBC-HS512");
        let token = jwe::serialize_compact(jws.as_bytes(), &jwe_header, &self.jwe_encrypter)
            .map_err(CryptoError::Token)?;

        Ok(IssuedToken {
            token,
            db_token: jti,
        })
    }

    /// Decrypt the outer JWE, verify the inner signature, then validate
    /// time-based claims against now.
    pub fn verify(&self, token: &str) -> Result<JwtPayload, CryptoError> {
        let (plaintext, _jwe_header) =
            jwe::deserialize_compact(token, &self.jwe_decrypter).map_err(CryptoError::Token)?;
        let jws = std::str::from_utf8(&plaintext)?;

        let (payload, _jws_header) =
            jwt::decode_with_verifier(jws, &self.jwt_verifier).map_err(CryptoError::Token)?;

        let mut validator = JwtPayloadValidator::new();
        validator.set_base_time(SystemTime::now());
        validator.validate(&payload).map_err(CryptoError::Token)?;

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn issued_token_verifies_and_carries_its_claims() {
        let keys = AuthKeys::generate().unwrap();

        let issued = keys
            .issue_with(
                "user-123",
                TokenOptions {
                    issuer: Some("apikit".into()),
                    expires_at: Some(Utc::now() + Duration::hours(1)),
                },
            )
            .unwrap();

        let payload = keys.verify(&issued.token).unwrap();
        assert_eq!(payload.subject(), Some("user-123"));
        assert_eq!(payload.jwt_id(), Some(issued.db_token.as_str()));
        assert_eq!(payload.issuer(), Some("apikit"));
    }

    #[test]
    fn db_token_is_fresh_per_issue() {
        let keys = AuthKeys::generate().unwrap();
        let first = keys.issue("user-123").unwrap();
        let second = keys.issue("user-123").unwrap();
        assert_ne!(first.db_token, second.db_token);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let keys = AuthKeys::generate().unwrap();
        let issued = keys.issue("user-123").unwrap();

        let mut tampered = issued.token.clone();
        tampered.truncate(tampered.len() - 2);

        assert!(keys.verify(&tampered).is_err());
    }

    #[test]
    fn tokens_do_not_verify_under_different_keys() {
        let keys = AuthKeys::generate().unwrap();
        let other = AuthKeys::generate().unwrap();

        let issued = keys.issue("user-123").unwrap();
        assert!(other.verify(&issued.token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let keys = AuthKeys::generate().unwrap();

        let issued = keys
            .issue_with(
                "user-123",
                TokenOptions {
                    issuer: None,
                    expires_at: Some(Utc::now() - Duration::hours(1)),
                },
            )
            .unwrap();

        assert!(keys.verify(&issued.token).is_err());
    }
}
