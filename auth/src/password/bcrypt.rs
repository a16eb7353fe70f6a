use bcrypt::BcryptError;

use super::errors::PasswordError;

/// Work factor used for every stored hash.
pub const DEFAULT_COST: u32 = 10;

/// Shortest secret accepted for hashing or verification, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Password hashing implementation.
///
/// Salted bcrypt at a fixed cost. Holds no state, so one instance can be
/// shared freely across threads. Both operations are deliberately
/// CPU-expensive; async callers should run them on a blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher configured with bcrypt cost 10
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt string (`$2b$10$...`) embedding cost, salt and digest
    ///
    /// # Errors
    /// * `WeakInput` - Password shorter than `MIN_PASSWORD_LENGTH`
    /// * `HashingFailed` - The bcrypt primitive failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        check_length(password)?;

        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`, not an error.
    ///
    /// # Errors
    /// * `WeakInput` - Password shorter than `MIN_PASSWORD_LENGTH`
    /// * `MalformedHash` - Stored hash cannot be parsed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        check_length(password)?;

        bcrypt::verify(password, hash).map_err(|e| match e {
            BcryptError::InvalidCost(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidHash(_)
            | BcryptError::InvalidSaltLen(_)
            | BcryptError::InvalidBase64(_) => PasswordError::MalformedHash(e.to_string()),
            other => PasswordError::HashingFailed(other.to_string()),
        })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn check_length(password: &str) -> Result<(), PasswordError> {
    let actual = password.chars().count();
    if actual < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::WeakInput {
            min: MIN_PASSWORD_LENGTH,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$2b$10$"));

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_distinct_secrets_never_cross_verify() {
        let hasher = PasswordHasher::new();
        let secrets = ["sixchr", "hunter22", "correct horse battery", "pässwörd"];

        let hashes: Vec<String> = secrets
            .iter()
            .map(|s| hasher.hash(s).expect("Failed to hash password"))
            .collect();

        for (i, secret) in secrets.iter().enumerate() {
            for (j, hash) in hashes.iter().enumerate() {
                let matched = hasher.verify(secret, hash).expect("Failed to verify");
                assert_eq!(matched, i == j, "secret {} against hash {}", i, j);
            }
        }
    }

    #[test]
    fn test_same_secret_gets_fresh_salt() {
        let hasher = PasswordHasher::new();
        let first = hasher.hash("same_secret").unwrap();
        let second = hasher.hash("same_secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_short_password_rejected() {
        let hasher = PasswordHasher::new();

        assert_eq!(
            hasher.hash("12345"),
            Err(PasswordError::WeakInput { min: 6, actual: 5 })
        );
        assert_eq!(
            hasher.verify("", "$2b$10$abcdefghijklmnopqrstuu"),
            Err(PasswordError::WeakInput { min: 6, actual: 0 })
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let hasher = PasswordHasher::new();
        // Six characters, twelve bytes.
        assert!(hasher.hash("éééééé").is_ok());
        // Five characters, ten bytes.
        assert!(matches!(
            hasher.hash("ééééé"),
            Err(PasswordError::WeakInput { actual: 5, .. })
        ));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }
}
