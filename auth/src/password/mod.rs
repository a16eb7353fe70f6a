pub mod bcrypt;
pub mod errors;

pub use self::bcrypt::PasswordHasher;
pub use self::bcrypt::DEFAULT_COST;
pub use self::bcrypt::MIN_PASSWORD_LENGTH;
pub use errors::PasswordError;
