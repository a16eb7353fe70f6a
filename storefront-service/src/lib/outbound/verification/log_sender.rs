use async_trait::async_trait;
use auth::VerificationCode;

use crate::domain::user::models::User;
use crate::user::errors::DeliveryError;
use crate::user::ports::VerificationCodeSender;

/// Development delivery channel: writes the code to the service log.
///
/// Stands in for an email or SMS gateway. Never enable it where the log is
/// readable by anyone other than the account owner.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCodeSender;

impl LogCodeSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VerificationCodeSender for LogCodeSender {
    async fn send_code(&self, user: &User, code: &VerificationCode) -> Result<(), DeliveryError> {
        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            code = code.as_str(),
            "Verification code issued (development delivery)"
        );
        Ok(())
    }
}
