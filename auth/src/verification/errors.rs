use thiserror::Error;

/// Error type for verification code generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Random source failed: {0}")]
    RandomSource(String),
}
