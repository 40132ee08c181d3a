use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::application::errors::DomainError;

/// Upper bound for a single approach; anything above is rejected as a typo.
pub const MAX_REPS_PER_APPROACH: i32 = 1000;

/// One logged approach: a rep count for a user on a calendar day.
///
/// Events are immutable once recorded; corrections are new events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseEvent {
    pub user_id: i64,
    pub date: NaiveDate,
    pub count: i32,
}

impl ExerciseEvent {
    pub fn new(user_id: i64, date: NaiveDate, count: i32) -> Result<Self, DomainError> {
        validate_count(count)?;
        Ok(Self { user_id, date, count })
    }
}

/// Validate a rep count against the (0, 1000] range.
pub fn validate_count(count: i32) -> Result<(), DomainError> {
    if count <= 0 {
        return Err(DomainError::InvalidCount);
    }
    if count > MAX_REPS_PER_APPROACH {
        return Err(DomainError::CountTooHigh);
    }
    Ok(())
}

/// A user's exercise events for one calendar day.
///
/// This is a view over events, not a separately persisted row. The session
/// remembers how many of its events are already stored so that saving
/// writes exactly the new ones.
#[derive(Debug, Clone)]
pub struct DailySession {
    pub user_id: i64,
    pub date: NaiveDate,
    events: Vec<ExerciseEvent>,
    persisted: usize,
}

impl DailySession {
    /// Empty session for a day with no activity yet
    pub fn new(user_id: i64, date: NaiveDate) -> Self {
        Self {
            user_id,
            date,
            events: Vec::new(),
            persisted: 0,
        }
    }

    /// Session reconstructed from already-stored events
    pub fn from_events(user_id: i64, date: NaiveDate, events: Vec<ExerciseEvent>) -> Self {
        let persisted = events.len();
        Self {
            user_id,
            date,
            events,
            persisted,
        }
    }

    /// Append a new approach after validating the count. On failure the
    /// session is left unmodified.
    pub fn add_approach(&mut self, count: i32) -> Result<(), DomainError> {
        let event = ExerciseEvent::new(self.user_id, self.date, count)?;
        self.events.push(event);
        Ok(())
    }

    pub fn events(&self) -> &[ExerciseEvent] {
        &self.events
    }

    /// Events appended since the last save
    pub fn unsaved_events(&self) -> &[ExerciseEvent] {
        &self.events[self.persisted..]
    }

    pub fn mark_saved(&mut self) {
        self.persisted = self.events.len();
    }

    pub fn total_count(&self) -> i32 {
        self.events.iter().map(|e| e.count).sum()
    }

    pub fn approach_count(&self) -> usize {
        self.events.len()
    }

    pub fn average_per_approach(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        f64::from(self.total_count()) / self.events.len() as f64
    }

    pub fn is_today(&self) -> bool {
        self.date == Local::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn add_approach_accumulates_totals() {
        let mut session = DailySession::new(7, day());
        session.add_approach(15).unwrap();
        session.add_approach(20).unwrap();
        session.add_approach(10).unwrap();
        assert_eq!(session.total_count(), 45);
        assert_eq!(session.approach_count(), 3);
        assert!((session.average_per_approach() - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_counts() {
        let mut session = DailySession::new(7, day());
        session.add_approach(1).unwrap();
        session.add_approach(1000).unwrap();
        assert_eq!(session.approach_count(), 2);
    }

    #[test]
    fn invalid_count_leaves_session_unmodified() {
        let mut session = DailySession::new(7, day());
        session.add_approach(10).unwrap();
        assert_eq!(session.add_approach(0), Err(DomainError::InvalidCount));
        assert_eq!(session.add_approach(-5), Err(DomainError::InvalidCount));
        assert_eq!(session.add_approach(1001), Err(DomainError::CountTooHigh));
        assert_eq!(session.total_count(), 10);
        assert_eq!(session.approach_count(), 1);
    }

    #[test]
    fn empty_session_has_zero_average() {
        let session = DailySession::new(7, day());
        assert_eq!(session.total_count(), 0);
        assert_eq!(session.average_per_approach(), 0.0);
    }

    #[test]
    fn unsaved_events_track_the_save_watermark() {
        let events = vec![ExerciseEvent::new(7, day(), 12).unwrap()];
        let mut session = DailySession::from_events(7, day(), events);
        assert!(session.unsaved_events().is_empty());

        session.add_approach(8).unwrap();
        assert_eq!(session.unsaved_events().len(), 1);
        assert_eq!(session.unsaved_events()[0].count, 8);

        session.mark_saved();
        assert!(session.unsaved_events().is_empty());
        assert_eq!(session.total_count(), 20);
    }
}
