use async_trait::async_trait;

use crate::application::errors::CacheError;
use crate::domain::entities::{ExerciseEvent, User};

/// Cache trait - abstraction over a fast, non-authoritative lookup layer.
///
/// Entries are addressed by keys derived from the entity identifier
/// (`user:<platform_id>`, `event:<user_id>`) and never expire; staleness is
/// the caller's responsibility to detect. The event entry holds the list of
/// events last mirrored for that user.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_user(&self, platform_id: i64) -> Result<Option<User>, CacheError>;
    async fn set_user(&self, user: &User) -> Result<(), CacheError>;

    async fn get_events(&self, user_id: i64) -> Result<Option<Vec<ExerciseEvent>>, CacheError>;
    async fn set_events(&self, user_id: i64, events: &[ExerciseEvent]) -> Result<(), CacheError>;
}
