use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::repositories::UserRepository;
use crate::domain::entities::User;

/// Business logic for user identity
pub struct UserService {
    users: Arc<UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self { users }
    }

    /// Resolve a user on first contact, creating the record if needed
    pub async fn get_or_create_user(
        &self,
        platform_id: i64,
        phone: &str,
        nickname: &str,
    ) -> Result<User, BotError> {
        self.users.get_or_create(platform_id, phone, nickname).await
    }

    pub async fn get_user(&self, platform_id: i64) -> Result<User, BotError> {
        self.users
            .get_by_platform_id(platform_id)
            .await?
            .ok_or_else(|| BotError::NotFound(format!("user {}", platform_id)))
    }

    pub async fn update_nickname(
        &self,
        platform_id: i64,
        nickname: &str,
    ) -> Result<User, BotError> {
        self.users.update_nickname(platform_id, nickname).await
    }

    pub async fn exists(&self, platform_id: i64) -> Result<bool, BotError> {
        Ok(self.users.exists(platform_id).await?)
    }
}
