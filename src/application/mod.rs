//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Repositories: cache-first data access over the Store/Cache ports
//! - Services: Business logic orchestration
//! - Messaging: Message parsing and routing
//! - Errors: Domain-specific errors

pub mod errors;
pub mod messaging;
pub mod repositories;
pub mod services;
