use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let command = body.try_into_domain()?;

    let session = state.user_service.register(command).await?;

    Ok(ApiSuccess::new(StatusCode::CREATED, (&session).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    email: String,
    password: String,
}

impl RegisterRequestBody {
    fn try_into_domain(self) -> Result<RegisterCommand, ApiError> {
        let email = EmailAddress::new(self.email)
            .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;
        Ok(RegisterCommand::new(email, self.password))
    }
}
