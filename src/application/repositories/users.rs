//! User repository - cache-first identity resolution, creation on first
//! contact and nickname updates.

use std::sync::Arc;

use crate::application::errors::{BotError, StorageError};
use crate::application::repositories::spawn_cache_write;
use crate::domain::entities::User;
use crate::domain::traits::{Cache, Store};

pub struct UserRepository {
    store: Arc<dyn Store>,
    cache: Arc<dyn Cache>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn Store>, cache: Arc<dyn Cache>) -> Self {
        Self { store, cache }
    }

    /// Look a user up by platform ID, cache first with store fallback.
    /// A store hit schedules a cache population off the request path.
    pub async fn get_by_platform_id(
        &self,
        platform_id: i64,
    ) -> Result<Option<User>, StorageError> {
        match self.cache.get_user(platform_id).await {
            Ok(Some(user)) => return Ok(Some(user)),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(platform_id, error = %e, "user cache lookup failed");
            }
        }

        let Some(user) = self.store.get_user(platform_id).await? else {
            return Ok(None);
        };

        self.mirror_to_cache("user-fill", user.clone());
        Ok(Some(user))
    }

    /// Return the existing user for this platform ID, or create one.
    ///
    /// For an existing user the incoming phone/nickname are ignored; the
    /// stored record is returned unmodified. A new user is validated before
    /// the store write, and the store assigns the durable identifier.
    pub async fn get_or_create(
        &self,
        platform_id: i64,
        phone: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Result<User, BotError> {
        if let Some(existing) = self.get_by_platform_id(platform_id).await? {
            return Ok(existing);
        }

        let mut user = User::new(platform_id, phone, nickname);
        user.validate()?;

        user.id = self.store.add_user(&user).await?;
        tracing::info!(platform_id, user_id = user.id, "created user");

        self.mirror_to_cache("user-create", user.clone());
        Ok(user)
    }

    /// Change the user's nickname. The store update is synchronous and its
    /// failure surfaces to the caller; the cache update does not.
    pub async fn update_nickname(
        &self,
        platform_id: i64,
        nickname: &str,
    ) -> Result<User, BotError> {
        let Some(mut user) = self.get_by_platform_id(platform_id).await? else {
            return Err(BotError::NotFound(format!("user {}", platform_id)));
        };

        user.update_nickname(nickname)?;
        self.store.update_user(&user).await?;

        self.mirror_to_cache("user-update", user.clone());
        Ok(user)
    }

    /// True when the user is known to the cache or the store; the caller
    /// cannot tell which one answered.
    pub async fn exists(&self, platform_id: i64) -> Result<bool, StorageError> {
        match self.cache.get_user(platform_id).await {
            Ok(Some(_)) => return Ok(true),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(platform_id, error = %e, "user cache lookup failed");
            }
        }
        Ok(self.store.get_user(platform_id).await?.is_some())
    }

    fn mirror_to_cache(&self, task: &'static str, user: User) {
        let cache = Arc::clone(&self.cache);
        spawn_cache_write(task, user.platform_id, async move {
            cache.set_user(&user).await
        });
    }
}
