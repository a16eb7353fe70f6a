pub mod errors;
pub mod issuer;

pub use errors::VerificationError;
pub use issuer::VerificationCode;
pub use issuer::VerificationCodeIssuer;
pub use issuer::CODE_LENGTH;
