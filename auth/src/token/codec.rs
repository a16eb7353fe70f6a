use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::bearer::parse_bearer;
use super::claims::Claims;
use super::errors::TokenError;
use crate::identity::Identity;

/// Lifetime of every session token issued by the system.
pub const SESSION_TTL_DAYS: i64 = 30;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signed, self-contained session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Three-segment JWT (header.claims.signature)
    pub access_token: String,
    pub identity: Identity,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Session token encoder and verifier.
///
/// Owns the process-wide signing secret, injected once at construction.
/// Tokens are HS256 only: anything else, `none` included, is rejected
/// before the signature is even looked at.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a new token codec with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// The system-wide session lifetime (30 days).
    pub fn default_ttl() -> Duration {
        Duration::days(SESSION_TTL_DAYS)
    }

    /// Issue a signed token for an identity.
    ///
    /// # Arguments
    /// * `identity` - Principal to embed; user id, email and role are all mandatory
    /// * `ttl` - Lifetime; `expires_at = now + ttl`
    ///
    /// # Errors
    /// * `InvalidIdentity` - User id is zero or email is blank
    /// * `Signing` - Token encoding failed
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<SessionToken, TokenError> {
        if identity.user_id == 0 {
            return Err(TokenError::InvalidIdentity(
                "user id must be positive".to_string(),
            ));
        }
        if identity.email.trim().is_empty() {
            return Err(TokenError::InvalidIdentity("email is required".to_string()));
        }

        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime out of range".to_string()))?;

        let claims = Claims::for_identity(identity, issued_at, expires_at);
        let access_token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(SessionToken {
            access_token,
            identity: identity.clone(),
            issued_at,
            expires_at,
        })
    }

    /// Verify an `Authorization` header value and recover its identity.
    ///
    /// # Arguments
    /// * `authorization` - Header value in `Bearer <token>` form
    ///
    /// # Errors
    /// * `MalformedHeader` / `UnsupportedScheme` - Header is not a bearer credential
    /// * `BadSignature` - Unexpected algorithm or signature mismatch
    /// * `TokenExpired` - Token is past its `exp`
    /// * `MalformedClaims` - Mandatory claims missing or ill-typed
    pub fn verify(&self, authorization: &str) -> Result<Identity, TokenError> {
        let token = parse_bearer(authorization)?;
        self.decode(token)
    }

    /// Decode and validate a raw token (no scheme prefix).
    pub fn decode(&self, token: &str) -> Result<Identity, TokenError> {
        let header = decode_header(token).map_err(|e| TokenError::BadSignature(e.to_string()))?;
        if header.alg != ALGORITHM {
            return Err(TokenError::BadSignature(format!(
                "unexpected signing algorithm {:?}",
                header.alg
            )));
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                        TokenError::MalformedClaims(e.to_string())
                    }
                    _ => TokenError::BadSignature(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.user_id == 0 {
            return Err(TokenError::MalformedClaims(
                "user_id must be positive".to_string(),
            ));
        }
        if claims.email.trim().is_empty() {
            return Err(TokenError::MalformedClaims("email is empty".to_string()));
        }

        Ok(claims.identity())
    }
}
