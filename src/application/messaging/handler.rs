//! Message handler - routes parsed messages to services and formats the
//! user-facing replies.

use std::sync::Arc;

use crate::application::errors::{BotError, DomainError};
use crate::application::services::{UserService, WorkoutService};
use crate::domain::entities::{Content, DailySession, Message, MonthlyStats, User, WeeklyStats};
use crate::domain::traits::KeyboardButton;

const FALLBACK_NICKNAME: &str = "athlete";

/// Outgoing reply, optionally with a reply keyboard attached
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Vec<Vec<KeyboardButton>>>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    fn with_keyboard(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(main_keyboard()),
        }
    }
}

/// Main reply keyboard shown after /start
pub fn main_keyboard() -> Vec<Vec<KeyboardButton>> {
    vec![
        vec![
            KeyboardButton::new("📊 Stats"),
            KeyboardButton::new("📅 Month"),
        ],
        vec![
            KeyboardButton::new("❓ Help"),
            KeyboardButton::new("🏠 Menu"),
        ],
    ]
}

pub struct MessageHandler {
    users: Arc<UserService>,
    workouts: Arc<WorkoutService>,
}

impl MessageHandler {
    pub fn new(users: Arc<UserService>, workouts: Arc<WorkoutService>) -> Self {
        Self { users, workouts }
    }

    /// Handle one incoming message end to end and produce a reply.
    /// Never returns an error to the transport; failures become
    /// user-facing text.
    pub async fn handle(&self, message: &Message) -> Reply {
        let Some(sender) = &message.sender else {
            return Reply::text("I could not tell who sent that message.");
        };

        // Username/first-name may be absent on Telegram; fall back so the
        // user invariants hold.
        let phone = sender
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("user_{}", sender.platform_id));
        let nickname = sender
            .first_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| FALLBACK_NICKNAME.to_string());

        let user = match self
            .users
            .get_or_create_user(sender.platform_id, &phone, &nickname)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(platform_id = sender.platform_id, error = %e, "failed to resolve user");
                return Reply::text("Something went wrong. Please try again later.");
            }
        };

        match &message.content {
            Content::Command { name, args } => self.handle_command(&user, name, args).await,
            Content::RepCount(count) => self.handle_rep_count(&user, *count).await,
            Content::Text(_) => Reply::text(
                "Send me a number of reps (for example: 15) or use /help.",
            ),
            Content::Empty => Reply::text("Send me a number of reps (for example: 15)."),
        }
    }

    async fn handle_command(&self, user: &User, name: &str, args: &[String]) -> Reply {
        match name {
            "start" => Reply::with_keyboard(start_text(user)),
            "help" => Reply::text(help_text()),
            "stats" => match self.workouts.weekly_stats(user.id).await {
                Ok(stats) => Reply::text(format_weekly(&stats)),
                Err(e) => {
                    tracing::error!(user_id = user.id, error = %e, "failed to get weekly stats");
                    Reply::text("Could not fetch your stats. Please try again later.")
                }
            },
            "month" => match self.workouts.monthly_stats(user.id).await {
                Ok(stats) => Reply::text(format_monthly(&stats)),
                Err(e) => {
                    tracing::error!(user_id = user.id, error = %e, "failed to get monthly stats");
                    Reply::text("Could not fetch your stats. Please try again later.")
                }
            },
            "today" => match self.workouts.today_session(user.id).await {
                Ok(session) => Reply::text(format_today(&session)),
                Err(e) => {
                    tracing::error!(user_id = user.id, error = %e, "failed to get today session");
                    Reply::text("Could not fetch today's session. Please try again later.")
                }
            },
            "name" => self.handle_rename(user, args).await,
            other => Reply::text(format!(
                "Unknown command: /{}\n\nSend me a rep count (for example: 15) or use /help.",
                other
            )),
        }
    }

    async fn handle_rename(&self, user: &User, args: &[String]) -> Reply {
        let nickname = args.join(" ");
        match self.users.update_nickname(user.platform_id, &nickname).await {
            Ok(updated) => Reply::text(format!("Got it, I'll call you {} from now on.", updated)),
            Err(BotError::Domain(DomainError::InvalidNickname)) => {
                Reply::text("Usage: /name <new nickname>")
            }
            Err(e) => {
                tracing::error!(user_id = user.id, error = %e, "failed to update nickname");
                Reply::text("Could not update your nickname. Please try again later.")
            }
        }
    }

    async fn handle_rep_count(&self, user: &User, count: i32) -> Reply {
        match self.workouts.add_approach(user.id, count).await {
            Ok(session) => Reply::text(format_approach_saved(&session, count)),
            Err(BotError::Domain(DomainError::InvalidCount)) => {
                Reply::text("The rep count must be greater than 0.")
            }
            Err(BotError::Domain(DomainError::CountTooHigh)) => {
                Reply::text("That's more than 1000 reps in one approach. Impressive, but no.")
            }
            Err(e) => {
                tracing::error!(user_id = user.id, count, error = %e, "failed to record approach");
                Reply::text("Could not save that approach. Please try again later.")
            }
        }
    }
}

fn start_text(user: &User) -> String {
    format!(
        "Hi, {}! 👋\n\n\
         I keep track of your pushups.\n\n\
         📝 How to use:\n\
         • Send the rep count of each approach as a plain number\n\
         • For example: \"15\", \"20\", \"10\"\n\n\
         📊 Commands:\n\
         /today - today's session\n\
         /stats - weekly stats\n\
         /month - monthly stats and streak\n\
         /name <nickname> - change your nickname\n\
         /help - help\n\n\
         Good luck with your training! 💪",
        user.nickname
    )
}

fn help_text() -> String {
    "🤖 How to use the bot:\n\n\
     • Send the rep count of each approach as a plain number\n\
     • For example: \"15\", \"20\", \"10\"\n\n\
     📊 Commands:\n\
     /start - greeting and instructions\n\
     /today - today's session\n\
     /stats - weekly stats\n\
     /month - monthly stats and streak\n\
     /name <nickname> - change your nickname\n\
     /help - this message\n\n\
     💡 Tips:\n\
     • Rest between approaches\n\
     • Increase the load gradually\n\
     • Consistency beats volume"
        .to_string()
}

fn format_approach_saved(session: &DailySession, last_count: i32) -> String {
    format!(
        "✅ Saved {} reps!\n\n\
         📊 Today so far:\n\
         \u{2022} Total reps: {}\n\
         \u{2022} Approaches: {}\n\
         \u{2022} Average per approach: {:.1}{}",
        last_count,
        session.total_count(),
        session.approach_count(),
        session.average_per_approach(),
        motivation(session.total_count())
    )
}

fn format_today(session: &DailySession) -> String {
    if session.approach_count() == 0 {
        return "Nothing logged today yet. Send me a rep count to get started!".to_string();
    }
    format!(
        "📊 Today:\n\
         \u{2022} Total reps: {}\n\
         \u{2022} Approaches: {}\n\
         \u{2022} Average per approach: {:.1}",
        session.total_count(),
        session.approach_count(),
        session.average_per_approach()
    )
}

fn format_weekly(stats: &WeeklyStats) -> String {
    if stats.total_count == 0 {
        return "📈 No stats for this week yet.\n\nStart training by sending me rep counts!"
            .to_string();
    }
    let mut text = format!(
        "📈 This week:\n\n\
         Total reps: {}\n\
         Training days: {}\n\
         Average per day: {:.1}\n\
         Best day: {} reps",
        stats.total_count, stats.training_days, stats.average_per_day, stats.best_day
    );
    if let Some(date) = stats.best_day_date {
        text.push_str(&format!(" ({})", date.format("%A")));
    }
    text.push_str(weekly_motivation(stats.total_count));
    text
}

fn format_monthly(stats: &MonthlyStats) -> String {
    if stats.total_count == 0 && stats.streak == 0 {
        return "📈 No stats for this month yet.\n\nStart training by sending me rep counts!"
            .to_string();
    }
    let mut text = format!(
        "📅 {}:\n\n\
         Total reps: {}\n\
         Training days: {}\n\
         Average per day: {:.1}\n\
         Best day: {} reps",
        stats.month.format("%B %Y"),
        stats.total_count,
        stats.training_days,
        stats.average_per_day,
        stats.best_day
    );
    if let Some(date) = stats.best_day_date {
        text.push_str(&format!(" ({})", date.format("%B %-d")));
    }
    text.push_str(&format!("\nCurrent streak: {} day(s) 🔥", stats.streak));
    text
}

fn motivation(total: i32) -> &'static str {
    match total {
        t if t > 100 => "\n\n🔥 Incredible! You're a machine!",
        t if t > 50 => "\n\n🔥 Great work! Keep it up!",
        t if t > 20 => "\n\n💪 Solid result! You can do more!",
        _ => "\n\n👍 Let's go! Every approach counts!",
    }
}

fn weekly_motivation(total: i32) -> &'static str {
    match total {
        t if t > 200 => "\n\n🔥 Excellent week! You're on the right track!",
        t if t > 100 => "\n\n💪 Good job! You can do more!",
        _ => "\n\n👍 Just getting started! Every day counts!",
    }
}
