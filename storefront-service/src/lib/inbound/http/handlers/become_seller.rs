use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Promote the caller to seller. The response carries a new token: the
/// caller's current one still says CUSTOMER until it expires.
pub async fn become_seller(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let session = state
        .user_service
        .become_seller(&UserId::from(&identity))
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, (&session).into()))
}
