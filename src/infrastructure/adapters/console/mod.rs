//! Console adapter for development/testing

use async_trait::async_trait;
use std::io::Write;

use crate::application::errors::BotError;
use crate::domain::traits::{Bot, BotInfo, KeyboardButton};

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "fetchbot".to_string(),
                username: "console".to_string(),
            },
        }
    }

    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let mut input = String::new();
        let read = std::io::stdin().read_line(&mut input).ok()?;
        if read == 0 {
            return None;
        }
        Some(input.trim().to_string())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    async fn send_photo(&self, _chat_id: &str, url: &str) -> Result<String, BotError> {
        println!("[PHOTO] {}", url);
        Ok("console_msg".to_string())
    }

    async fn send_with_keyboard(
        &self,
        _chat_id: &str,
        text: &str,
        buttons: Vec<Vec<KeyboardButton>>,
    ) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        for row in buttons {
            let row_text: Vec<String> = row.iter().map(|b| b.text.clone()).collect();
            println!("  [Buttons] {}", row_text.join(" | "));
        }
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
