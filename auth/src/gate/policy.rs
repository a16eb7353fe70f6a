use std::sync::Arc;

use super::errors::GateError;
use crate::identity::Identity;
use crate::identity::Role;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Post-verification predicate applied by a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any identity with a positive user id.
    Authenticated,
    /// Authenticated and carrying the SELLER role.
    Seller,
}

impl AccessPolicy {
    fn permits(&self, identity: &Identity) -> Result<(), GateError> {
        match self {
            AccessPolicy::Authenticated => Ok(()),
            AccessPolicy::Seller if identity.role == Role::Seller => Ok(()),
            AccessPolicy::Seller => Err(GateError::InsufficientRole {
                required: Role::Seller,
                actual: identity.role,
            }),
        }
    }
}

/// Request-pipeline stage turning a bearer header into an authorization
/// decision.
///
/// Per request: header present, then token valid, then role permitted.
/// The first failing step is terminal. The role predicate only runs on
/// a token whose signature and expiry already checked out.
#[derive(Clone)]
pub struct AuthorizationGate {
    codec: Arc<TokenCodec>,
    policy: AccessPolicy,
}

impl AuthorizationGate {
    pub fn new(codec: Arc<TokenCodec>, policy: AccessPolicy) -> Self {
        Self { codec, policy }
    }

    /// Gate admitting any authenticated user.
    pub fn authenticated(codec: Arc<TokenCodec>) -> Self {
        Self::new(codec, AccessPolicy::Authenticated)
    }

    /// Gate admitting sellers only.
    pub fn seller(codec: Arc<TokenCodec>) -> Self {
        Self::new(codec, AccessPolicy::Seller)
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    /// Run the gate against a request's `Authorization` header.
    ///
    /// # Arguments
    /// * `authorization` - Header value, `None` when the header is absent
    ///
    /// # Returns
    /// The verified identity to attach to the request context
    ///
    /// # Errors
    /// * `MissingCredentials` - Header absent or blank
    /// * `AuthenticationFailed` - Token did not verify; carries the reason
    /// * `InsufficientRole` - Token is valid but the policy rejects its role
    pub fn authorize(&self, authorization: Option<&str>) -> Result<Identity, GateError> {
        let header = authorization
            .filter(|value| !value.trim().is_empty())
            .ok_or(GateError::MissingCredentials)?;

        let identity = self
            .codec
            .verify(header)
            .map_err(GateError::AuthenticationFailed)?;

        if identity.user_id == 0 {
            return Err(GateError::AuthenticationFailed(TokenError::MalformedClaims(
                "user_id must be positive".to_string(),
            )));
        }

        self.policy.permits(&identity)?;

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(b"gate_secret_key_at_least_32_bytes!").unwrap())
    }

    fn header_for(codec: &TokenCodec, identity: &Identity, ttl: Duration) -> String {
        let session = codec.issue(identity, ttl).expect("Failed to issue token");
        format!("Bearer {}", session.access_token)
    }

    #[test]
    fn test_missing_header() {
        let gate = AuthorizationGate::authenticated(codec());

        assert_eq!(gate.authorize(None), Err(GateError::MissingCredentials));
        assert_eq!(gate.authorize(Some("")), Err(GateError::MissingCredentials));
        assert_eq!(gate.authorize(Some("   ")), Err(GateError::MissingCredentials));
    }

    #[test]
    fn test_authenticated_gate_accepts_both_roles() {
        let codec = codec();
        let gate = AuthorizationGate::authenticated(Arc::clone(&codec));

        for role in [Role::Customer, Role::Seller] {
            let identity = Identity::new(7, "u@shop.io", role);
            let header = header_for(&codec, &identity, Duration::hours(1));
            assert_eq!(gate.authorize(Some(&header)), Ok(identity));
        }
    }

    #[test]
    fn test_seller_gate() {
        let codec = codec();
        let any = AuthorizationGate::authenticated(Arc::clone(&codec));
        let seller = AuthorizationGate::seller(Arc::clone(&codec));

        let customer = Identity::new(7, "buyer@shop.io", Role::Customer);
        let customer_header = header_for(&codec, &customer, Duration::hours(1));
        assert_eq!(
            seller.authorize(Some(&customer_header)),
            Err(GateError::InsufficientRole {
                required: Role::Seller,
                actual: Role::Customer,
            })
        );
        assert_eq!(any.authorize(Some(&customer_header)), Ok(customer));

        let merchant = Identity::new(8, "seller@shop.io", Role::Seller);
        let merchant_header = header_for(&codec, &merchant, Duration::hours(1));
        assert_eq!(seller.authorize(Some(&merchant_header)), Ok(merchant));
    }

    #[test]
    fn test_role_checked_only_after_verification() {
        let codec = codec();
        let seller = AuthorizationGate::seller(Arc::clone(&codec));

        // An expired customer token must report expiry, not the role.
        let customer = Identity::new(7, "buyer@shop.io", Role::Customer);
        let expired = header_for(&codec, &customer, Duration::seconds(-1));
        assert_eq!(
            seller.authorize(Some(&expired)),
            Err(GateError::AuthenticationFailed(TokenError::TokenExpired))
        );

        let foreign = TokenCodec::new(b"another_secret_key_at_least_32_b!").unwrap();
        let forged = header_for(&foreign, &customer, Duration::hours(1));
        assert!(matches!(
            seller.authorize(Some(&forged)),
            Err(GateError::AuthenticationFailed(TokenError::BadSignature(_)))
        ));
    }

    #[test]
    fn test_authentication_failure_carries_reason() {
        let gate = AuthorizationGate::authenticated(codec());

        let err = gate.authorize(Some("Basic dXNlcjpwYXNz")).unwrap_err();
        assert_eq!(
            err,
            GateError::AuthenticationFailed(TokenError::UnsupportedScheme("Basic".to_string()))
        );
        assert_eq!(err.kind(), "unsupported_scheme");
        assert!(!err.is_forbidden());
    }
}
