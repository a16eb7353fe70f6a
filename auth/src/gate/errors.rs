use thiserror::Error;

use crate::identity::Role;
use crate::token::TokenError;

/// Reasons an authorization gate halts a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(#[source] TokenError),

    #[error("Insufficient role: {required} required, token carries {actual}")]
    InsufficientRole { required: Role, actual: Role },
}

impl GateError {
    /// Stable label for logs. For authentication failures this is the
    /// underlying token error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::MissingCredentials => "missing_credentials",
            GateError::AuthenticationFailed(reason) => reason.kind(),
            GateError::InsufficientRole { .. } => "insufficient_role",
        }
    }

    /// Whether the caller was identified but lacks permission, as opposed
    /// to not being identified at all.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, GateError::InsufficientRole { .. })
    }
}
