use std::sync::Arc;
use std::time::Duration;

use auth::AccessPolicy;
use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::become_seller::become_seller;
use super::handlers::current_user::current_user;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::seller_session::seller_session;
use super::handlers::verification::confirm_code;
use super::handlers::verification::issue_code;
use super::middleware::authorize;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
}

/// Build the HTTP application.
///
/// Routes fall into three groups: public, any authenticated user, and
/// sellers only. Each protected group carries its own gate, built from the
/// authenticator's shared token codec.
pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authenticator: &Authenticator,
) -> Router {
    let state = AppState { user_service };

    let authenticated_gate = Arc::new(authenticator.gate(AccessPolicy::Authenticated));
    let seller_gate = Arc::new(authenticator.gate(AccessPolicy::Seller));

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let authenticated_routes = Router::new()
        .route("/api/users/me", get(current_user))
        .route("/api/users/verify", get(issue_code).post(confirm_code))
        .route("/api/users/become-seller", post(become_seller))
        .route_layer(middleware::from_fn_with_state(
            authenticated_gate,
            authorize,
        ));

    let seller_routes = Router::new()
        .route("/api/seller/session", get(seller_session))
        .route_layer(middleware::from_fn_with_state(seller_gate, authorize));

    // Header values are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(seller_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
