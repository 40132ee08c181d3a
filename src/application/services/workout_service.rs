use std::sync::Arc;

use chrono::Local;

use crate::application::errors::BotError;
use crate::application::repositories::{SessionRepository, StatsAggregator};
use crate::domain::entities::{DailySession, MonthlyStats, WeeklyStats};

/// Business logic for logging approaches and reading statistics
pub struct WorkoutService {
    sessions: Arc<SessionRepository>,
    stats: Arc<StatsAggregator>,
}

impl WorkoutService {
    pub fn new(sessions: Arc<SessionRepository>, stats: Arc<StatsAggregator>) -> Self {
        Self { sessions, stats }
    }

    /// Record one approach and return the updated session for today
    pub async fn add_approach(&self, user_id: i64, count: i32) -> Result<DailySession, BotError> {
        self.sessions.record_approach(user_id, count).await
    }

    /// Today's session; an empty one when nothing has been logged yet
    pub async fn today_session(&self, user_id: i64) -> Result<DailySession, BotError> {
        let session = self.sessions.get_today_session(user_id).await?;
        Ok(session.unwrap_or_else(|| DailySession::new(user_id, Local::now().date_naive())))
    }

    pub async fn weekly_stats(&self, user_id: i64) -> Result<WeeklyStats, BotError> {
        Ok(self.stats.weekly(user_id).await?)
    }

    pub async fn monthly_stats(&self, user_id: i64) -> Result<MonthlyStats, BotError> {
        Ok(self.stats.monthly(user_id).await?)
    }
}
