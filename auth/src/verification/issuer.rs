use std::fmt;

use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::VerificationError;

/// Number of decimal digits in a verification code.
pub const CODE_LENGTH: usize = 6;

const CODE_SPACE: u32 = 1_000_000;

// Largest multiple of CODE_SPACE that fits in a u32; draws at or above it
// are discarded so every code is equally likely.
const ACCEPT_BELOW: u32 = (u32::MAX / CODE_SPACE) * CODE_SPACE;

/// Short numeric code for secondary verification (onboarding).
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against user input in constant time.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}

/// Generates verification codes from the operating system CSPRNG.
///
/// Stateless: binding a code to a user and enforcing its lifetime is up
/// to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationCodeIssuer;

impl VerificationCodeIssuer {
    pub fn new() -> Self {
        Self
    }

    /// Generate a 6-digit code.
    ///
    /// # Errors
    /// * `RandomSource` - The OS entropy source failed
    pub fn generate_code(&self) -> Result<VerificationCode, VerificationError> {
        self.generate_code_with(&mut OsRng)
    }

    /// Generate a code from the given random source.
    pub fn generate_code_with<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<VerificationCode, VerificationError> {
        loop {
            let mut bytes = [0u8; 4];
            rng.try_fill_bytes(&mut bytes)
                .map_err(|e| VerificationError::RandomSource(e.to_string()))?;

            let draw = u32::from_le_bytes(bytes);
            if draw < ACCEPT_BELOW {
                let code = format!("{:0width$}", draw % CODE_SPACE, width = CODE_LENGTH);
                return Ok(VerificationCode(code));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy pool unavailable",
            )))
        }
    }

    /// Replays fixed little-endian u32 draws.
    struct ScriptedRng(Vec<u32>);

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            self.0.remove(0)
        }

        fn next_u64(&mut self) -> u64 {
            u64::from(self.next_u32())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let draw = self.next_u32().to_le_bytes();
            dest.copy_from_slice(&draw[..dest.len()]);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_generate_code_shape() {
        let issuer = VerificationCodeIssuer::new();
        for _ in 0..100 {
            let code = issuer.generate_code().expect("Failed to generate code");
            assert_eq!(code.as_str().len(), CODE_LENGTH);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let issuer = VerificationCodeIssuer::new();
        let code = issuer
            .generate_code_with(&mut ScriptedRng(vec![42]))
            .unwrap();
        assert_eq!(code.as_str(), "000042");
    }

    #[test]
    fn test_biased_draws_are_discarded() {
        let issuer = VerificationCodeIssuer::new();
        let code = issuer
            .generate_code_with(&mut ScriptedRng(vec![u32::MAX, ACCEPT_BELOW, 1_999_999]))
            .unwrap();
        assert_eq!(code.as_str(), "999999");
    }

    #[test]
    fn test_codes_vary() {
        let issuer = VerificationCodeIssuer::new();
        let mut rng = StdRng::seed_from_u64(7);
        let codes: HashSet<String> = (0..50)
            .map(|_| {
                issuer
                    .generate_code_with(&mut rng)
                    .unwrap()
                    .as_str()
                    .to_string()
            })
            .collect();
        assert!(codes.len() > 40);
    }

    #[test]
    fn test_random_source_failure() {
        let issuer = VerificationCodeIssuer::new();
        assert!(matches!(
            issuer.generate_code_with(&mut FailingRng),
            Err(VerificationError::RandomSource(_))
        ));
    }

    #[test]
    fn test_matches() {
        let code = VerificationCode("031337".to_string());
        assert!(code.matches("031337"));
        assert!(!code.matches("31337"));
        assert!(!code.matches("031338"));
        assert!(!code.matches(""));
    }

    #[test]
    fn test_debug_hides_digits() {
        let code = VerificationCode("123456".to_string());
        assert!(!format!("{:?}", code).contains("123456"));
    }
}
