use chrono::{DateTime, Utc};

/// Message content after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Command { name: String, args: Vec<String> },
    /// A bare number: one approach with that many reps
    RepCount(i32),
    Text(String),
    Empty,
}

impl Content {
    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// Who sent the message, as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub platform_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// An incoming chat message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Option<Sender>,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }
}
