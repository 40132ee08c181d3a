//! Session repository - resolves "today's session" cache-first with a
//! mandatory staleness check, persists approaches to the store and mirrors
//! them into the cache off the request path.

use std::sync::Arc;

use chrono::Local;

use crate::application::errors::{BotError, StorageError};
use crate::application::repositories::{spawn_cache_write, UserLocks};
use crate::domain::entities::{session::validate_count, DailySession, ExerciseEvent};
use crate::domain::traits::{Cache, Store};

pub struct SessionRepository {
    store: Arc<dyn Store>,
    cache: Arc<dyn Cache>,
    locks: UserLocks,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn Store>, cache: Arc<dyn Cache>) -> Self {
        Self {
            store,
            cache,
            locks: UserLocks::new(),
        }
    }

    /// Resolve the user's session for the current calendar day.
    ///
    /// Cache first: cached events are only trusted if dated today, so an
    /// entry written late on day N is rejected when read on day N+1. On a
    /// cache miss (or stale/failing cache) falls back to the store; a store
    /// hit schedules a cache population that never blocks this call.
    /// `Ok(None)` means the user has not logged anything today.
    pub async fn get_today_session(
        &self,
        user_id: i64,
    ) -> Result<Option<DailySession>, StorageError> {
        let today = Local::now().date_naive();

        match self.cache.get_events(user_id).await {
            Ok(Some(events)) => {
                let todays: Vec<ExerciseEvent> =
                    events.into_iter().filter(|e| e.date == today).collect();
                if !todays.is_empty() {
                    return Ok(Some(DailySession::from_events(user_id, today, todays)));
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user_id, error = %e, "cache lookup failed, falling back to store");
            }
        }

        let events = self.store.get_events_for_date(user_id, today).await?;
        if events.is_empty() {
            return Ok(None);
        }

        let cache = Arc::clone(&self.cache);
        let mirrored = events.clone();
        spawn_cache_write("session-fill", user_id, async move {
            cache.set_events(user_id, &mirrored).await
        });

        Ok(Some(DailySession::from_events(user_id, today, events)))
    }

    /// Persist the session's unsaved approaches.
    ///
    /// The store write is synchronous and authoritative; on success the
    /// day's events are mirrored into the cache asynchronously, and that
    /// write may lag or fail silently.
    pub async fn save_session(&self, session: &mut DailySession) -> Result<(), StorageError> {
        for event in session.unsaved_events() {
            self.store.add_event(event).await?;
        }
        session.mark_saved();

        let cache = Arc::clone(&self.cache);
        let user_id = session.user_id;
        let events = session.events().to_vec();
        spawn_cache_write("session-save", user_id, async move {
            cache.set_events(user_id, &events).await
        });

        Ok(())
    }

    /// Record one approach for the user, creating today's session if needed.
    ///
    /// The count is validated before any I/O. The read-modify-write cycle
    /// runs under the user's lock so concurrent submissions cannot lose an
    /// update.
    pub async fn record_approach(
        &self,
        user_id: i64,
        count: i32,
    ) -> Result<DailySession, BotError> {
        validate_count(count)?;

        let _guard = self.locks.acquire(user_id).await;

        let today = Local::now().date_naive();
        let mut session = self
            .get_today_session(user_id)
            .await?
            .unwrap_or_else(|| DailySession::new(user_id, today));

        session.add_approach(count)?;
        self.save_session(&mut session).await?;

        Ok(session)
    }
}
