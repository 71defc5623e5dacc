use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Start the bot and begin listening for messages
    async fn start(&self) -> Result<(), BotError>;

    /// Send a text message to a chat
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError>;

    /// Send a photo to a chat by URL
    async fn send_photo(&self, chat_id: &str, url: &str) -> Result<String, BotError>;

    /// Send a message with a one-time reply keyboard
    async fn send_with_keyboard(
        &self,
        chat_id: &str,
        text: &str,
        buttons: Vec<Vec<KeyboardButton>>,
    ) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// A single reply keyboard button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
