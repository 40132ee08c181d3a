//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite durable store
//! - Cache: In-process non-expiring cache
//! - Adapters: Platform integrations (Telegram, console)

pub mod adapters;
pub mod cache;
pub mod config;
pub mod database;
