//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, DailySession, stats, Message)
//! - Traits: Abstractions for infrastructure (Store, Cache, Bot)

pub mod entities;
pub mod traits;
