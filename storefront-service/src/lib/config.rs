use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_days")]
    pub expiration_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VerificationConfig {
    pub code_ttl_minutes: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    /// Upper bound on bcrypt operations running at once.
    pub max_concurrent_hashes: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            max_concurrent_hashes: 8,
        }
    }
}

fn default_expiration_days() -> i64 {
    auth::token::SESSION_TTL_DAYS
}

/// Longest session lifetime the service accepts.
pub const MAX_EXPIRATION_DAYS: i64 = 365;

/// Longest verification code lifetime the service accepts (one day).
pub const MAX_CODE_TTL_MINUTES: i64 = 24 * 60;

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// A missing or empty signing secret is a startup error.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT__SECRET)".to_string(),
            ));
        }
        if !(1..=MAX_EXPIRATION_DAYS).contains(&self.jwt.expiration_days) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_days must be between 1 and {}",
                MAX_EXPIRATION_DAYS
            )));
        }
        if !(1..=MAX_CODE_TTL_MINUTES).contains(&self.verification.code_ttl_minutes) {
            return Err(ConfigError::Message(format!(
                "verification.code_ttl_minutes must be between 1 and {}",
                MAX_CODE_TTL_MINUTES
            )));
        }
        if self.password.max_concurrent_hashes == 0 {
            return Err(ConfigError::Message(
                "password.max_concurrent_hashes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Tests that touch process environment variables take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn config_with_secret(secret: &str) -> Config {
        Config {
            server: ServerConfig { http_port: 8080 },
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiration_days: 30,
            },
            verification: VerificationConfig::default(),
            password: PasswordConfig::default(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(config_with_secret("a-long-enough-signing-secret").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        assert!(config_with_secret("").validate().is_err());
        assert!(config_with_secret("   ").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_ttls() {
        let mut config = config_with_secret("secret");
        config.jwt.expiration_days = 0;
        assert!(config.validate().is_err());

        let mut config = config_with_secret("secret");
        config.verification.code_ttl_minutes = -5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_ttls() {
        let mut config = config_with_secret("secret");
        config.jwt.expiration_days = MAX_EXPIRATION_DAYS;
        assert!(config.validate().is_ok());
        config.jwt.expiration_days = i64::MAX;
        assert!(config.validate().is_err());

        let mut config = config_with_secret("secret");
        config.verification.code_ttl_minutes = MAX_CODE_TTL_MINUTES;
        assert!(config.validate().is_ok());
        config.verification.code_ttl_minutes = MAX_CODE_TTL_MINUTES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reads_secret_from_environment() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        env::set_var("JWT__SECRET", "secret-from-the-environment");
        env::set_var("VERIFICATION__CODE_TTL_MINUTES", "15");

        let loaded = Config::load();

        env::remove_var("JWT__SECRET");
        env::remove_var("VERIFICATION__CODE_TTL_MINUTES");

        let config = loaded.expect("JWT__SECRET should satisfy the secret requirement");
        assert_eq!(config.jwt.secret, "secret-from-the-environment");
        assert_eq!(config.verification.code_ttl_minutes, 15);
        assert_eq!(config.server.http_port, 8080);
    }

    #[test]
    fn test_load_without_secret_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        env::remove_var("JWT__SECRET");

        assert!(Config::load().is_err());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let configuration = ConfigBuilder::builder()
            .set_override("server.http_port", 3000)
            .unwrap()
            .set_override("jwt.secret", "from-test")
            .unwrap()
            .build()
            .unwrap();

        let config: Config = configuration.try_deserialize().unwrap();
        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.jwt.expiration_days, 30);
        assert_eq!(config.verification.code_ttl_minutes, 10);
        assert_eq!(config.password.max_concurrent_hashes, 8);
    }
}
