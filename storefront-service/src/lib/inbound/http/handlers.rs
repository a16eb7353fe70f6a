use auth::GateError;
use auth::Role;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod become_seller;
pub mod current_user;
pub mod login;
pub mod register;
pub mod seller_session;
pub mod verification;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    /// Halted by an authorization gate; the reason label goes out with it.
    Gate(GateError),
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        Self::Gate(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, reason) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::Gate(err) => {
                let status = if err.is_forbidden() {
                    StatusCode::FORBIDDEN
                } else {
                    StatusCode::UNAUTHORIZED
                };
                let message = match &err {
                    GateError::MissingCredentials => err.to_string(),
                    GateError::AuthenticationFailed(_) => "Invalid or expired token".to_string(),
                    GateError::InsufficientRole { required, .. } => {
                        format!("{} role required", required)
                    }
                };
                (status, message, Some(err.kind().to_string()))
            }
        };

        (
            status,
            Json(ApiResponseBody::new_error(status, message, reason)),
        )
            .into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_)
            | UserError::AlreadyVerified
            | UserError::ConcurrentModification(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::NotVerified => ApiError::Forbidden(err.to_string()),
            UserError::InvalidEmail(_)
            | UserError::Password(auth::PasswordError::WeakInput { .. }) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::VerificationCodeNotIssued
            | UserError::VerificationCodeExpired
            | UserError::InvalidVerificationCode => ApiError::BadRequest(err.to_string()),
            UserError::Password(_)
            | UserError::Token(_)
            | UserError::Verification(_)
            | UserError::Delivery(_)
            | UserError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, reason: Option<String>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, reason },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Public view of a user. Never includes the password hash or pending code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: u64,
    pub email: String,
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            email: user.email.as_str().to_string(),
            role: user.role,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub user: UserData,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&AuthenticatedSession> for SessionResponseData {
    fn from(session: &AuthenticatedSession) -> Self {
        Self {
            user: (&session.user).into(),
            token: session.token.access_token.clone(),
            expires_at: session.token.expires_at,
        }
    }
}
