use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// A key environment variable was absent.
    #[error("{0} is not set in the environment")]
    MissingKey(&'static str),

    /// Key material could not be parsed into a usable key.
    #[error("invalid key material: {0}")]
    Key(#[source] josekit::JoseError),

    /// The token failed to decrypt, verify, or validate.
    #[error("token rejected: {0}")]
    Token(#[source] josekit::JoseError),

    /// The decrypted payload was not a UTF-8 JWS.
    #[error("token payload is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),
}
