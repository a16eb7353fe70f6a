use std::sync::Arc;
use std::sync::OnceLock;

use chrono::Duration;

use crate::gate::AccessPolicy;
use crate::gate::AuthorizationGate;
use crate::identity::Identity;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::SessionToken;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Plaintext behind the hash that unknown accounts are checked against.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Authentication coordinator combining password verification and token issuance.
///
/// Owns the single `TokenCodec` of the process and hands out gates that
/// share it.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
    session_ttl: Duration,
    decoy_hash: OnceLock<String>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(),
            token_codec: Arc::new(TokenCodec::new(secret)?),
            session_ttl: TokenCodec::default_ttl(),
            decoy_hash: OnceLock::new(),
        })
    }

    /// Override the lifetime of issued tokens (defaults to 30 days).
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Password too short or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Runs the same bcrypt verification `authenticate` would, against a
    /// decoy hash, so response time does not reveal whether the account
    /// exists.
    ///
    /// # Returns
    /// * `InvalidCredentials` - For any password of acceptable length
    /// * `PasswordError` - Password too short, as `authenticate` reports it
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        match self
            .decoy_hash()
            .and_then(|hash| self.password_hasher.verify(password, hash))
        {
            Ok(_) => AuthenticationError::InvalidCredentials,
            Err(err) => AuthenticationError::PasswordError(err),
        }
    }

    fn decoy_hash(&self) -> Result<&str, PasswordError> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash);
        }
        let hash = self.password_hasher.hash(DECOY_PASSWORD)?;
        Ok(self.decoy_hash.get_or_init(|| hash))
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Identity to embed in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password too short or stored hash malformed
    /// * `TokenError` - Token issuance failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &Identity,
    ) -> Result<SessionToken, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(identity)?)
    }

    /// Issue a session token without password verification.
    ///
    /// Used right after registration or a role change, when the caller
    /// has already been authenticated by other means.
    pub fn issue_token(&self, identity: &Identity) -> Result<SessionToken, TokenError> {
        self.token_codec.issue(identity, self.session_ttl)
    }

    /// Validate an `Authorization` header value.
    pub fn validate_token(&self, authorization: &str) -> Result<Identity, TokenError> {
        self.token_codec.verify(authorization)
    }

    /// Build an authorization gate sharing this authenticator's codec.
    pub fn gate(&self, policy: AccessPolicy) -> AuthorizationGate {
        AuthorizationGate::new(Arc::clone(&self.token_codec), policy)
    }
}
