use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store.
///
/// Ids are assigned sequentially from 1. Email uniqueness is checked under
/// the same write lock as the insert, so concurrent registrations of one
/// address cannot both succeed. Updates compare the caller's version with
/// the stored one under the write lock.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<u64, User>>,
    next_id: AtomicU64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|existing| existing.email.as_str().eq_ignore_ascii_case(user.email.as_str()))
        {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let created = User {
            id: UserId(id),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            verified: false,
            pending_verification: None,
            created_at: user.created_at,
            updated_at: user.created_at,
            version: 0,
        };
        users.insert(id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.as_str().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        let stored = users
            .get_mut(&user.id.0)
            .ok_or_else(|| UserError::NotFound(user.id.to_string()))?;

        if stored.version != user.version {
            return Err(UserError::ConcurrentModification(user.id.to_string()));
        }

        let mut updated = user;
        updated.version += 1;
        *stored = updated.clone();

        Ok(updated)
    }
}
