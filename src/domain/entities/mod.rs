//! Domain entities - Core business objects with no external dependencies

pub mod message;
pub mod session;
pub mod stats;
pub mod user;

pub use message::{Content, Message, Sender};
pub use session::{DailySession, ExerciseEvent, MAX_REPS_PER_APPROACH};
pub use stats::{MonthlyStats, WeeklyStats};
pub use user::User;
