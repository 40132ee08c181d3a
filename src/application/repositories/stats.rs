//! Statistics aggregator - weekly/monthly rollups computed from raw
//! exercise events on each request. Nothing here is persisted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::application::errors::StorageError;
use crate::domain::entities::{ExerciseEvent, MonthlyStats, WeeklyStats};
use crate::domain::traits::Store;

pub struct StatsAggregator {
    store: Arc<dyn Store>,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Stats for the week containing today. A user with no events in the
    /// window gets an all-zero result, not an error.
    pub async fn weekly(&self, user_id: i64) -> Result<WeeklyStats, StorageError> {
        let today = Local::now().date_naive();
        let events = self.store.get_events(user_id).await?;
        Ok(build_weekly(user_id, today, &events))
    }

    /// Stats for the month containing today, including the current streak.
    pub async fn monthly(&self, user_id: i64) -> Result<MonthlyStats, StorageError> {
        let today = Local::now().date_naive();
        let events = self.store.get_events(user_id).await?;
        Ok(build_monthly(user_id, today, &events))
    }
}

/// `[start of week, start of week + 7 days)`, weeks starting on Sunday
fn week_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    (start, start + Duration::days(7))
}

/// `[first of month, first of next month)`
fn month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1).unwrap_or(start)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1).unwrap_or(start)
    };
    (start, end)
}

/// Sum counts per calendar day within the half-open window `[from, to)`
fn daily_totals(events: &[ExerciseEvent], from: NaiveDate, to: NaiveDate) -> BTreeMap<NaiveDate, i32> {
    let mut totals = BTreeMap::new();
    for event in events {
        if event.date >= from && event.date < to {
            *totals.entry(event.date).or_insert(0) += event.count;
        }
    }
    totals
}

fn best_day(totals: &BTreeMap<NaiveDate, i32>) -> (i32, Option<NaiveDate>) {
    let mut best = 0;
    let mut best_date = None;
    for (date, total) in totals {
        // Strict comparison keeps the earliest day on ties
        if *total > best {
            best = *total;
            best_date = Some(*date);
        }
    }
    (best, best_date)
}

fn build_weekly(user_id: i64, today: NaiveDate, events: &[ExerciseEvent]) -> WeeklyStats {
    let (start, end) = week_window(today);
    let totals = daily_totals(events, start, end);

    let mut stats = WeeklyStats::empty(user_id, start, end);
    stats.training_days = totals.len() as u32;
    stats.total_count = totals.values().sum();
    (stats.best_day, stats.best_day_date) = best_day(&totals);
    if stats.training_days > 0 {
        stats.average_per_day = f64::from(stats.total_count) / f64::from(stats.training_days);
    }
    stats
}

fn build_monthly(user_id: i64, today: NaiveDate, events: &[ExerciseEvent]) -> MonthlyStats {
    let (start, end) = month_window(today);
    let totals = daily_totals(events, start, end);

    let mut stats = MonthlyStats::empty(user_id, start);
    stats.training_days = totals.len() as u32;
    stats.total_count = totals.values().sum();
    (stats.best_day, stats.best_day_date) = best_day(&totals);
    if stats.training_days > 0 {
        stats.average_per_day = f64::from(stats.total_count) / f64::from(stats.training_days);
    }

    // The streak looks past the month window on purpose: a run that began
    // last month still counts.
    let active_days: BTreeSet<NaiveDate> = events.iter().map(|e| e.date).collect();
    stats.streak = streak(&active_days, today);

    stats
}

/// Consecutive active days ending at today (only if today is active) or at
/// yesterday. Zero when the last activity is older than yesterday.
fn streak(active_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let anchor = if active_days.contains(&today) {
        today
    } else if active_days.contains(&(today - Duration::days(1))) {
        today - Duration::days(1)
    } else {
        return 0;
    };

    let mut count = 0;
    let mut day = anchor;
    while active_days.contains(&day) {
        count += 1;
        day -= Duration::days(1);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(d: NaiveDate, count: i32) -> ExerciseEvent {
        ExerciseEvent::new(1, d, count).unwrap()
    }

    #[test]
    fn week_window_starts_on_sunday() {
        // 2025-03-12 is a Wednesday
        let (start, end) = week_window(date(2025, 3, 12));
        assert_eq!(start, date(2025, 3, 9));
        assert_eq!(end, date(2025, 3, 16));

        // A Sunday starts its own week
        let (start, _) = week_window(date(2025, 3, 9));
        assert_eq!(start, date(2025, 3, 9));
    }

    #[test]
    fn month_window_handles_december() {
        assert_eq!(
            month_window(date(2025, 12, 15)),
            (date(2025, 12, 1), date(2026, 1, 1))
        );
        assert_eq!(
            month_window(date(2025, 2, 28)),
            (date(2025, 2, 1), date(2025, 3, 1))
        );
    }

    #[test]
    fn weekly_example_from_mixed_days() {
        // Mon:10, Mon:5, Wed:20 in the week of 2025-03-09
        let today = date(2025, 3, 12);
        let events = vec![
            event(date(2025, 3, 10), 10),
            event(date(2025, 3, 10), 5),
            event(date(2025, 3, 12), 20),
        ];
        let stats = build_weekly(1, today, &events);
        assert_eq!(stats.total_count, 35);
        assert_eq!(stats.training_days, 2);
        assert_eq!(stats.best_day, 20);
        assert_eq!(stats.best_day_date, Some(date(2025, 3, 12)));
        assert!((stats.average_per_day - 17.5).abs() < f64::EPSILON);
    }

    #[test]
    fn weekly_with_no_events_is_all_zero() {
        let stats = build_weekly(1, date(2025, 3, 12), &[]);
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.training_days, 0);
        assert_eq!(stats.average_per_day, 0.0);
        assert_eq!(stats.best_day, 0);
        assert_eq!(stats.best_day_date, None);
    }

    #[test]
    fn weekly_window_is_half_open() {
        let today = date(2025, 3, 12);
        let events = vec![
            event(date(2025, 3, 9), 10),  // window start, included
            event(date(2025, 3, 15), 7),  // last day, included
            event(date(2025, 3, 16), 99), // next week, excluded
            event(date(2025, 3, 8), 99),  // previous week, excluded
        ];
        let stats = build_weekly(1, today, &events);
        assert_eq!(stats.total_count, 17);
        assert_eq!(stats.training_days, 2);
    }

    #[test]
    fn best_day_tie_keeps_earliest_date() {
        let today = date(2025, 3, 12);
        let events = vec![event(date(2025, 3, 10), 20), event(date(2025, 3, 11), 20)];
        let stats = build_weekly(1, today, &events);
        assert_eq!(stats.best_day, 20);
        assert_eq!(stats.best_day_date, Some(date(2025, 3, 10)));
    }

    #[test]
    fn monthly_filters_to_calendar_month() {
        let today = date(2025, 3, 20);
        let events = vec![
            event(date(2025, 3, 1), 10),
            event(date(2025, 3, 20), 30),
            event(date(2025, 2, 28), 99), // previous month
            event(date(2025, 4, 1), 99),  // next month
        ];
        let stats = build_monthly(1, today, &events);
        assert_eq!(stats.month, date(2025, 3, 1));
        assert_eq!(stats.total_count, 40);
        assert_eq!(stats.training_days, 2);
        assert_eq!(stats.best_day, 30);
    }

    #[test]
    fn streak_counts_back_from_today() {
        let today = date(2025, 3, 12);
        let days: BTreeSet<NaiveDate> = [
            date(2025, 3, 12),
            date(2025, 3, 11),
            date(2025, 3, 10),
            date(2025, 3, 8), // gap at the 9th
        ]
        .into_iter()
        .collect();
        assert_eq!(streak(&days, today), 3);
    }

    #[test]
    fn streak_may_anchor_at_yesterday() {
        let today = date(2025, 3, 12);
        let days: BTreeSet<NaiveDate> =
            [date(2025, 3, 11), date(2025, 3, 10)].into_iter().collect();
        assert_eq!(streak(&days, today), 2);
    }

    #[test]
    fn stale_activity_gives_zero_streak() {
        let today = date(2025, 3, 12);
        let days: BTreeSet<NaiveDate> = [date(2025, 3, 9)].into_iter().collect();
        assert_eq!(streak(&days, today), 0);
        assert_eq!(streak(&BTreeSet::new(), today), 0);
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let today = date(2025, 3, 2);
        let days: BTreeSet<NaiveDate> = [
            date(2025, 3, 2),
            date(2025, 3, 1),
            date(2025, 2, 28),
            date(2025, 2, 27),
        ]
        .into_iter()
        .collect();
        let events: Vec<ExerciseEvent> = days.iter().map(|d| event(*d, 10)).collect();
        let stats = build_monthly(1, today, &events);
        assert_eq!(stats.streak, 4);
        // But the month totals only cover March
        assert_eq!(stats.training_days, 2);
    }
}
