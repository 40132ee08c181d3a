//! Message handling - parsing and routing of incoming chat messages

pub mod handler;
pub mod parser;

pub use handler::{MessageHandler, Reply};
pub use parser::MessageParser;
