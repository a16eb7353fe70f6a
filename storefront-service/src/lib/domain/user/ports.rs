use async_trait::async_trait;
use auth::VerificationCode;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::VerificationCodeIssued;
use crate::user::errors::DeliveryError;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new customer account and sign it in.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Password shorter than the minimum length
    async fn register(&self, command: RegisterCommand) -> Result<AuthenticatedSession, UserError>;

    /// Check credentials and issue a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong or too-short password
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedSession, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Generate a verification code, bind it to the user and send it.
    ///
    /// Any previously issued code is replaced.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `AlreadyVerified` - Nothing left to verify
    /// * `Verification` - Random source failed
    /// * `Delivery` - The code could not be sent
    async fn issue_verification_code(
        &self,
        id: &UserId,
    ) -> Result<VerificationCodeIssued, UserError>;

    /// Check a submitted code and mark the user verified.
    ///
    /// # Errors
    /// * `VerificationCodeNotIssued` - No pending code
    /// * `VerificationCodeExpired` - Pending code is past its expiry
    /// * `InvalidVerificationCode` - Code does not match
    async fn verify_code(&self, id: &UserId, code: &str) -> Result<User, UserError>;

    /// Promote a verified user to seller and issue a token carrying the new role.
    ///
    /// # Errors
    /// * `NotVerified` - User has not completed verification
    async fn become_seller(&self, id: &UserId) -> Result<AuthenticatedSession, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user; the store assigns the id.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier (None if not found).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address, ignoring ASCII case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Replace a stored user if nobody wrote it since it was read.
    ///
    /// The write succeeds only when `user.version` equals the stored
    /// version; the returned user carries the bumped version.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `ConcurrentModification` - Stored version differs from `user.version`
    async fn update(&self, user: User) -> Result<User, UserError>;
}

/// Delivery channel for verification codes.
#[async_trait]
pub trait VerificationCodeSender: Send + Sync + 'static {
    async fn send_code(&self, user: &User, code: &VerificationCode) -> Result<(), DeliveryError>;
}
