use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::identity::Identity;
use crate::identity::Role;

/// Session token claim set.
///
/// Decoded in one pass: a missing field or a value of the wrong type
/// fails deserialization instead of surfacing later as a bad cast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: u64,
    pub email: String,
    pub role: Role,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build the claim set for an identity valid between two instants.
    pub fn for_identity(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email.clone(),
            role: identity.role,
            iat: Some(issued_at.timestamp()),
            exp: expires_at.timestamp(),
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.exp
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}
