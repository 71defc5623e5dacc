//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Content, Message, MessageType, User};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        if text.starts_with('/') || text.starts_with(&self.command_prefix) {
            return self.parse_command(chat_id, text, sender);
        }

        Message::new(chat_id, Content::Text(text))
            .with_message_type(MessageType::Text)
            .with_sender_opt(sender)
    }

    /// Parse a command message
    fn parse_command(&self, chat_id: String, text: String, sender: Option<User>) -> Message {
        let cmd_text = if let Some(stripped) = text.strip_prefix('/') {
            stripped
        } else {
            text.trim_start_matches(&self.command_prefix)
        };

        let mut parts = cmd_text.split_whitespace();
        let name = parts.next().unwrap_or("").to_string();
        let args: Vec<String> = parts.map(|s| s.to_string()).collect();

        Message::new(chat_id, Content::Command { name, args })
            .with_message_type(MessageType::Command)
            .with_sender_opt(sender)
            .with_raw_text(text)
    }
}

impl Message {
    /// Helper to set sender as Option
    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }

    /// Helper for MessageType
    pub fn with_message_type(mut self, mt: MessageType) -> Self {
        self.message_type = mt;
        self
    }
}
