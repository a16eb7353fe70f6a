use thiserror::Error;

/// Error type for session token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret is missing")]
    MissingSecret,

    #[error("Identity cannot be embedded in a token: {0}")]
    InvalidIdentity(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Malformed authorization header. Expected: Bearer <token>")]
    MalformedHeader,

    #[error("Unsupported authorization scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Token signature is invalid: {0}")]
    BadSignature(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token claims are malformed: {0}")]
    MalformedClaims(String),
}

impl TokenError {
    /// Stable label for logs and metrics. Never carries token material.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::MissingSecret => "missing_secret",
            TokenError::InvalidIdentity(_) => "invalid_identity",
            TokenError::Signing(_) => "signing",
            TokenError::MalformedHeader => "malformed_header",
            TokenError::UnsupportedScheme(_) => "unsupported_scheme",
            TokenError::BadSignature(_) => "bad_signature",
            TokenError::TokenExpired => "token_expired",
            TokenError::MalformedClaims(_) => "malformed_claims",
        }
    }
}
