use chrono::NaiveDate;

/// Aggregated statistics for one calendar week.
///
/// Purely derived from events, recomputed on each request.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyStats {
    pub user_id: i64,
    /// First day of the window (inclusive)
    pub week_start: NaiveDate,
    /// One past the last day of the window (exclusive)
    pub week_end: NaiveDate,
    pub total_count: i32,
    pub training_days: u32,
    pub average_per_day: f64,
    pub best_day: i32,
    pub best_day_date: Option<NaiveDate>,
}

impl WeeklyStats {
    pub fn empty(user_id: i64, week_start: NaiveDate, week_end: NaiveDate) -> Self {
        Self {
            user_id,
            week_start,
            week_end,
            total_count: 0,
            training_days: 0,
            average_per_day: 0.0,
            best_day: 0,
            best_day_date: None,
        }
    }
}

/// Aggregated statistics for one calendar month, plus the current streak.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    pub user_id: i64,
    /// First day of the month
    pub month: NaiveDate,
    pub total_count: i32,
    pub training_days: u32,
    pub average_per_day: f64,
    pub best_day: i32,
    pub best_day_date: Option<NaiveDate>,
    /// Consecutive active days ending today (or yesterday, if today is
    /// still empty)
    pub streak: u32,
}

impl MonthlyStats {
    pub fn empty(user_id: i64, month: NaiveDate) -> Self {
        Self {
            user_id,
            month,
            total_count: 0,
            training_days: 0,
            average_per_day: 0.0,
            best_day: 0,
            best_day_date: None,
            streak: 0,
        }
    }
}
