use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Issue a fresh code to the caller through the configured delivery channel.
pub async fn issue_code(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<ApiSuccess<CodeIssuedResponseData>, ApiError> {
    let issued = state
        .user_service
        .issue_verification_code(&UserId::from(&identity))
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::ACCEPTED,
        CodeIssuedResponseData {
            expires_at: issued.expires_at,
        },
    ))
}

pub async fn confirm_code(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(body): Json<ConfirmCodeRequestBody>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user = state
        .user_service
        .verify_code(&UserId::from(&identity), &body.code)
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeIssuedResponseData {
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfirmCodeRequestBody {
    code: String,
}
