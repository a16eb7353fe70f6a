use auth::PasswordError;
use auth::TokenError;
use auth::VerificationError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for verification code delivery
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Failed to deliver verification code: {0}")]
    SendFailed(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is already verified")]
    AlreadyVerified,

    #[error("No verification code has been issued")]
    VerificationCodeNotIssued,

    #[error("Verification code has expired")]
    VerificationCodeExpired,

    #[error("Invalid verification code")]
    InvalidVerificationCode,

    #[error("Account must be verified first")]
    NotVerified,

    // Infrastructure errors
    #[error("User {0} was modified concurrently")]
    ConcurrentModification(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
