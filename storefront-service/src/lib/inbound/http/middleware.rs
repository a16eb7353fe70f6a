use std::sync::Arc;

use auth::AuthorizationGate;
use auth::GateError;
use auth::Identity;
use auth::TokenError;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;

/// Identity admitted by an authorization gate, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ApiError::Gate(GateError::MissingCredentials))
    }
}

/// Middleware running the given gate over the `Authorization` header.
///
/// On success the identity is inserted into request extensions and the
/// request continues; on failure the request halts with 401 or 403 and the
/// handler is never called.
pub async fn authorize(
    State(gate): State<Arc<AuthorizationGate>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let decision = match req.headers().get(header::AUTHORIZATION) {
        None => gate.authorize(None),
        Some(value) => match value.to_str() {
            Ok(value) => gate.authorize(Some(value)),
            Err(_) => Err(GateError::AuthenticationFailed(TokenError::MalformedHeader)),
        },
    };

    let identity = decision.map_err(|err| {
        tracing::warn!(
            kind = err.kind(),
            policy = ?gate.policy(),
            method = %req.method(),
            uri = %req.uri(),
            "Request rejected by authorization gate"
        );
        ApiError::from(err)
    })?;

    req.extensions_mut().insert(AuthenticatedUser(identity));

    Ok(next.run(req).await)
}
