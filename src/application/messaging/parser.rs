//! Message parser - Parses raw text into structured messages

use crate::domain::entities::{Content, Message, Sender};

/// Reply-keyboard button labels and the commands they alias
const BUTTON_ALIASES: &[(&str, &str)] = &[
    ("📊 Stats", "stats"),
    ("📅 Month", "month"),
    ("❓ Help", "help"),
    ("🏠 Menu", "start"),
];

/// Parses incoming text into Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message. Commands and keyboard buttons become
    /// `Content::Command`; a bare integer is a rep count; everything else
    /// stays plain text.
    pub fn parse(
        &self,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        sender: Option<Sender>,
    ) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();
        let trimmed = text.trim();

        let content = if trimmed.starts_with(&self.command_prefix) {
            self.parse_command(trimmed)
        } else if let Some(name) = button_command(trimmed) {
            Content::Command {
                name: name.to_string(),
                args: vec![],
            }
        } else if let Ok(count) = trimmed.parse::<i32>() {
            Content::RepCount(count)
        } else if trimmed.is_empty() {
            Content::Empty
        } else {
            Content::Text(trimmed.to_string())
        };

        let mut message = Message::new(chat_id, content);
        if let Some(sender) = sender {
            message = message.with_sender(sender);
        }
        message
    }

    fn parse_command(&self, text: &str) -> Content {
        let cmd_text = text.trim_start_matches(&self.command_prefix);

        // Telegram appends @botname to commands in groups
        let parts: Vec<&str> = cmd_text.split_whitespace().collect();
        let name = parts
            .first()
            .map(|s| s.split('@').next().unwrap_or(s))
            .unwrap_or("")
            .to_string();
        let args = parts.iter().skip(1).map(|s| s.to_string()).collect();

        Content::Command { name, args }
    }
}

fn button_command(text: &str) -> Option<&'static str> {
    BUTTON_ALIASES
        .iter()
        .find(|(label, _)| *label == text)
        .map(|(_, command)| *command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MessageParser {
        MessageParser::new("/")
    }

    #[test]
    fn parses_commands_with_args() {
        let msg = parser().parse("1", "/name Sasha", None);
        assert_eq!(
            msg.content,
            Content::Command {
                name: "name".to_string(),
                args: vec!["Sasha".to_string()],
            }
        );
    }

    #[test]
    fn strips_bot_mention_from_group_commands() {
        let msg = parser().parse("1", "/stats@repbot", None);
        assert_eq!(
            msg.content,
            Content::Command {
                name: "stats".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn bare_numbers_are_rep_counts() {
        let msg = parser().parse("1", " 15 ", None);
        assert_eq!(msg.content, Content::RepCount(15));

        // Negative numbers still parse; validation happens downstream
        let msg = parser().parse("1", "-3", None);
        assert_eq!(msg.content, Content::RepCount(-3));
    }

    #[test]
    fn keyboard_buttons_alias_commands() {
        let msg = parser().parse("1", "📊 Stats", None);
        assert_eq!(
            msg.content,
            Content::Command {
                name: "stats".to_string(),
                args: vec![],
            }
        );
        let msg = parser().parse("1", "🏠 Menu", None);
        assert!(matches!(msg.content, Content::Command { ref name, .. } if name == "start"));
    }

    #[test]
    fn other_text_stays_text() {
        let msg = parser().parse("1", "did 15 pushups", None);
        assert_eq!(msg.content, Content::Text("did 15 pushups".to_string()));
        let msg = parser().parse("1", "   ", None);
        assert_eq!(msg.content, Content::Empty);
    }
}
