use std::fmt;
use std::str::FromStr;

use auth::Identity;
use auth::Role;
use auth::SessionToken;
use auth::VerificationCode;
use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;

/// Verification attempts allowed against one issued code.
pub const MAX_VERIFICATION_ATTEMPTS: u32 = 5;

/// User aggregate entity.
///
/// A registered account: customer by default, seller once verified and
/// promoted.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub verified: bool,
    pub pending_verification: Option<PendingVerification>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by the store on every successful update.
    pub version: u64,
}

impl User {
    /// Identity carried in this user's session tokens.
    pub fn identity(&self) -> Identity {
        Identity::new(self.id.0, self.email.as_str(), self.role)
    }
}

/// User unique identifier type, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl From<&Identity> for UserId {
    fn from(identity: &Identity) -> Self {
        UserId(identity.user_id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// Surrounding whitespace is dropped before validation.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_string();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Code issued to a user and not yet consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    pub code: VerificationCode,
    pub expires_at: DateTime<Utc>,
    pub failed_attempts: u32,
}

impl PendingVerification {
    pub fn new(code: VerificationCode, expires_at: DateTime<Utc>) -> Self {
        Self {
            code,
            expires_at,
            failed_attempts: 0,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// User data handed to the store before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Command to register a new customer account.
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Command to log in with email and password.
///
/// The email is kept raw: a malformed address is just an unknown account.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// A user together with a freshly issued session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: User,
    pub token: SessionToken,
}

/// Outcome of issuing a verification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationCodeIssued {
    pub expires_at: DateTime<Utc>,
}
