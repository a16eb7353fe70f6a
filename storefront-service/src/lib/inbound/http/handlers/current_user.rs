use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn current_user(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user = state
        .user_service
        .get_user(&UserId::from(&identity))
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}
