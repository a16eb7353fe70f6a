use auth::Role;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Echo the seller identity the gate admitted.
pub async fn seller_session(
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<ApiSuccess<SellerSessionData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        SellerSessionData {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.role,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerSessionData {
    pub user_id: u64,
    pub email: String,
    pub role: Role,
}
