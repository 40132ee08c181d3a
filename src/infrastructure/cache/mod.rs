//! In-process key/value cache
//!
//! Entries are JSON strings under deterministic keys (`user:<platform_id>`,
//! `event:<user_id>`) and never expire; whoever reads them decides whether
//! they are still fresh.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::application::errors::CacheError;
use crate::domain::entities::{ExerciseEvent, User};
use crate::domain::traits::Cache;

fn user_key(platform_id: i64) -> String {
    format!("user:{}", platform_id)
}

fn event_key(user_id: i64) -> String {
    format!("event:{}", user_id)
}

/// Non-expiring in-memory cache
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        let entries = self.entries.read().await;
        let Some(raw) = entries.get(key) else {
            return Ok(None);
        };
        serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    async fn set_json<T: serde::Serialize>(&self, key: String, value: &T) -> Result<(), CacheError> {
        let raw =
            serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.entries.write().await.insert(key, raw);
        Ok(())
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get_user(&self, platform_id: i64) -> Result<Option<User>, CacheError> {
        self.get_json(&user_key(platform_id)).await
    }

    async fn set_user(&self, user: &User) -> Result<(), CacheError> {
        self.set_json(user_key(user.platform_id), user).await
    }

    async fn get_events(&self, user_id: i64) -> Result<Option<Vec<ExerciseEvent>>, CacheError> {
        self.get_json(&event_key(user_id)).await
    }

    async fn set_events(&self, user_id: i64, events: &[ExerciseEvent]) -> Result<(), CacheError> {
        self.set_json(event_key(user_id), &events).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn user_entries_round_trip() {
        let cache = MemoryCache::new();
        assert!(cache.get_user(42).await.unwrap().is_none());

        let user = User::new(42, "+123456", "sasha");
        cache.set_user(&user).await.unwrap();
        assert_eq!(cache.get_user(42).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn set_events_replaces_the_entry() {
        let cache = MemoryCache::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let first = vec![ExerciseEvent::new(7, date, 15).unwrap()];
        cache.set_events(7, &first).await.unwrap();

        let second = vec![
            ExerciseEvent::new(7, date, 15).unwrap(),
            ExerciseEvent::new(7, date, 20).unwrap(),
        ];
        cache.set_events(7, &second).await.unwrap();

        let loaded = cache.get_events(7).await.unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[tokio::test]
    async fn user_and_event_keyspaces_are_disjoint() {
        let cache = MemoryCache::new();
        let user = User::new(7, "+123456", "sasha");
        cache.set_user(&user).await.unwrap();
        assert!(cache.get_events(7).await.unwrap().is_none());
    }
}
