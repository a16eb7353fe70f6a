//! Storefront authentication core
//!
//! Stateless building blocks for the storefront's session handling:
//! - Password hashing (bcrypt, cost 10)
//! - Signed session tokens (HS256 JWT) carrying identity and role
//! - Authorization gates (any authenticated user, sellers only)
//! - Numeric verification codes for onboarding
//!
//! Nothing here performs I/O. The signing secret is injected once at
//! construction and never read from ambient state.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Identity, Role, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let identity = Identity::new(42, "a@b.com", Role::Seller);
//! let session = codec.issue(&identity, TokenCodec::default_ttl()).unwrap();
//! let decoded = codec.verify(&format!("Bearer {}", session.access_token)).unwrap();
//! assert_eq!(decoded, identity);
//! ```
//!
//! ## Gates
//! ```
//! use auth::{AccessPolicy, Authenticator, GateError, Identity, Role};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let session = auth.issue_token(&Identity::new(7, "buyer@shop.io", Role::Customer)).unwrap();
//! let header = format!("Bearer {}", session.access_token);
//!
//! assert!(auth.gate(AccessPolicy::Authenticated).authorize(Some(&header)).is_ok());
//! assert!(matches!(
//!     auth.gate(AccessPolicy::Seller).authorize(Some(&header)),
//!     Err(GateError::InsufficientRole { .. })
//! ));
//! ```

pub mod authenticator;
pub mod gate;
pub mod identity;
pub mod password;
pub mod token;
pub mod verification;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use gate::AccessPolicy;
pub use gate::AuthorizationGate;
pub use gate::GateError;
pub use identity::Identity;
pub use identity::Role;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::SessionToken;
pub use token::TokenCodec;
pub use token::TokenError;
pub use verification::VerificationCode;
pub use verification::VerificationCodeIssuer;
pub use verification::VerificationError;
