//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod cache;
pub mod store;

pub use bot::{Bot, BotInfo, KeyboardButton};
pub use cache::Cache;
pub use store::Store;
