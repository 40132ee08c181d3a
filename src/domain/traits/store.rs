use async_trait::async_trait;
use chrono::NaiveDate;

use crate::application::errors::StorageError;
use crate::domain::entities::{ExerciseEvent, User};

/// Store trait - abstraction over the durable, authoritative data store.
///
/// Absence is always `Ok(None)` / an empty vec, never an error; errors mean
/// the operation itself failed and must propagate to the caller.
#[async_trait]
pub trait Store: Send + Sync {
    // User operations
    async fn get_user(&self, platform_id: i64) -> Result<Option<User>, StorageError>;
    /// Persist a new user; returns the store-assigned durable identifier
    async fn add_user(&self, user: &User) -> Result<i64, StorageError>;
    async fn update_user(&self, user: &User) -> Result<(), StorageError>;

    // Exercise event operations (one row per logged approach)
    async fn get_events(&self, user_id: i64) -> Result<Vec<ExerciseEvent>, StorageError>;
    async fn get_events_for_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<ExerciseEvent>, StorageError>;
    async fn add_event(&self, event: &ExerciseEvent) -> Result<(), StorageError>;
}
