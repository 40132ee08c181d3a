//! repbot - a pushup tracking chat bot
//!
//! Layered the usual way:
//! - `domain`: entities and the Store/Cache/Bot ports
//! - `application`: repositories, services, message routing
//! - `infrastructure`: config, SQLite store, in-process cache, adapters

pub mod application;
pub mod domain;
pub mod infrastructure;
