use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::PasswordError;
use auth::Role;
use auth::VerificationCodeIssuer;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PendingVerification;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::VerificationCodeIssued;
use crate::domain::user::models::MAX_VERIFICATION_ATTEMPTS;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;
use crate::user::ports::VerificationCodeSender;

const DEFAULT_CODE_TTL_MINUTES: i64 = 10;
const DEFAULT_MAX_CONCURRENT_HASHES: usize = 8;

/// Times a read-modify-write is retried after losing a race.
const MAX_WRITE_ATTEMPTS: usize = 16;

/// What a read-modify-write step decided about the user it was handed.
enum Change {
    /// Persist the user and return it.
    Commit,
    /// Persist the user, then fail with the given error.
    CommitAndFail(UserError),
    /// Return the user as read, without writing.
    Keep,
}

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// bcrypt work runs on the blocking pool, bounded by a semaphore so a burst
/// of logins cannot starve the runtime.
pub struct UserService<UR, VS>
where
    UR: UserRepository,
    VS: VerificationCodeSender,
{
    repository: Arc<UR>,
    code_sender: Arc<VS>,
    authenticator: Arc<Authenticator>,
    code_issuer: VerificationCodeIssuer,
    code_ttl: Duration,
    hashing_permits: Arc<Semaphore>,
}

impl<UR, VS> UserService<UR, VS>
where
    UR: UserRepository,
    VS: VerificationCodeSender,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `code_sender` - Verification code delivery
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, code_sender: Arc<VS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            code_sender,
            authenticator,
            code_issuer: VerificationCodeIssuer::new(),
            code_ttl: Duration::minutes(DEFAULT_CODE_TTL_MINUTES),
            hashing_permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_HASHES)),
        }
    }

    pub fn with_code_ttl(mut self, ttl: Duration) -> Self {
        self.code_ttl = ttl;
        self
    }

    pub fn with_max_concurrent_hashes(mut self, permits: usize) -> Self {
        self.hashing_permits = Arc::new(Semaphore::new(permits.max(1)));
        self
    }

    /// Run a password operation on the blocking pool.
    async fn run_password_task<T, F>(&self, task: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .hashing_permits
            .acquire()
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing pool closed: {}", e)))?;

        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || task(&authenticator))
            .await
            .map_err(|e| UserError::Unknown(format!("Password task failed: {}", e)))
    }

    /// Read a user, apply `change` and write the result back.
    ///
    /// The store rejects the write if another one landed since the read;
    /// the whole step then runs again on fresh state. An `Err` from
    /// `change` aborts without writing.
    async fn change_user<F>(&self, id: &UserId, mut change: F) -> Result<User, UserError>
    where
        F: FnMut(&mut User) -> Result<Change, UserError> + Send,
    {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let mut user = self
                .repository
                .find_by_id(id)
                .await?
                .ok_or_else(|| UserError::NotFound(id.to_string()))?;

            let outcome = change(&mut user)?;
            if let Change::Keep = outcome {
                return Ok(user);
            }

            match self.repository.update(user).await {
                Ok(saved) => {
                    return match outcome {
                        Change::CommitAndFail(err) => Err(err),
                        Change::Commit | Change::Keep => Ok(saved),
                    }
                }
                Err(UserError::ConcurrentModification(_)) => {
                    tracing::debug!(user_id = %id, "Concurrent user update, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(UserError::ConcurrentModification(id.to_string()))
    }

    fn session_for(&self, user: User) -> Result<AuthenticatedSession, UserError> {
        let token = self.authenticator.issue_token(&user.identity())?;
        Ok(AuthenticatedSession { user, token })
    }
}

#[async_trait]
impl<UR, VS> UserServicePort for UserService<UR, VS>
where
    UR: UserRepository,
    VS: VerificationCodeSender,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthenticatedSession, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password = command.password;
        let password_hash = self
            .run_password_task(move |authenticator| authenticator.hash_password(&password))
            .await??;

        let user = self
            .repository
            .create(NewUser {
                email: command.email,
                password_hash,
                role: Role::Customer,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.session_for(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedSession, UserError> {
        let password = command.password;
        let Some(user) = self.repository.find_by_email(command.email.trim()).await? else {
            let rejection = self
                .run_password_task(move |authenticator| {
                    authenticator.reject_unknown_account(&password)
                })
                .await?;
            tracing::debug!(reason = %rejection, "Login for unknown account");
            return Err(UserError::InvalidCredentials);
        };

        let stored_hash = user.password_hash.clone();
        let identity = user.identity();
        let token = self
            .run_password_task(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, &identity)
            })
            .await?
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials
                | AuthenticationError::PasswordError(PasswordError::WeakInput { .. }) => {
                    UserError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => UserError::Password(err),
                AuthenticationError::TokenError(err) => UserError::Token(err),
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthenticatedSession { user, token })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn issue_verification_code(
        &self,
        id: &UserId,
    ) -> Result<VerificationCodeIssued, UserError> {
        let code = self.code_issuer.generate_code()?;
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.code_ttl).ok_or_else(|| {
            UserError::Unknown("Verification code expiry is out of range".to_string())
        })?;

        let user = self
            .change_user(id, |user| {
                if user.verified {
                    return Err(UserError::AlreadyVerified);
                }
                user.pending_verification =
                    Some(PendingVerification::new(code.clone(), expires_at));
                user.updated_at = now;
                Ok(Change::Commit)
            })
            .await?;

        self.code_sender.send_code(&user, &code).await?;

        tracing::info!(user_id = %user.id, expires_at = %expires_at, "Verification code issued");

        Ok(VerificationCodeIssued { expires_at })
    }

    async fn verify_code(&self, id: &UserId, code: &str) -> Result<User, UserError> {
        let submitted = code.trim();
        let now = Utc::now();

        let result = self
            .change_user(id, |user| {
                if user.verified {
                    return Err(UserError::AlreadyVerified);
                }
                let Some(pending) = user.pending_verification.as_mut() else {
                    return Err(UserError::VerificationCodeNotIssued);
                };

                if pending.is_expired(now) {
                    user.pending_verification = None;
                    user.updated_at = now;
                    return Ok(Change::CommitAndFail(UserError::VerificationCodeExpired));
                }

                if !pending.code.matches(submitted) {
                    pending.failed_attempts += 1;
                    if pending.failed_attempts >= MAX_VERIFICATION_ATTEMPTS {
                        user.pending_verification = None;
                    }
                    user.updated_at = now;
                    return Ok(Change::CommitAndFail(UserError::InvalidVerificationCode));
                }

                user.verified = true;
                user.pending_verification = None;
                user.updated_at = now;
                Ok(Change::Commit)
            })
            .await;

        match &result {
            Ok(user) => tracing::info!(user_id = %user.id, "User verified"),
            Err(UserError::InvalidVerificationCode) => {
                tracing::warn!(user_id = %id, "Verification code mismatch")
            }
            Err(_) => {}
        }

        result
    }

    async fn become_seller(&self, id: &UserId) -> Result<AuthenticatedSession, UserError> {
        let user = self
            .change_user(id, |user| {
                if !user.verified {
                    return Err(UserError::NotVerified);
                }
                if user.role == Role::Seller {
                    return Ok(Change::Keep);
                }
                user.role = Role::Seller;
                user.updated_at = Utc::now();
                Ok(Change::Commit)
            })
            .await?;

        tracing::info!(user_id = %user.id, "Seller session issued");

        self.session_for(user)
    }
}
