//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::BotCommand;
use crate::domain::traits::{Bot, BotInfo, KeyboardButton};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, proxy: Option<&str>) -> Result<Self, BotError> {
        let mut builder = Client::builder();
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| BotError::Network(format!("invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        Ok(Self {
            token: token.into(),
            client,
            info: BotInfo {
                id: "unknown".to_string(),
                name: "fetchbot".to_string(),
                username: "fetchbot".to_string(),
            },
        })
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Response {
            result: BotInfoResponse,
        }

        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        self.info = BotInfo {
            id: data.result.id.to_string(),
            name: data.result.first_name,
            username: data.result.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let url = self.api_url("getUpdates");
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> i64 {
        updates.iter().map(|u| u.update_id + 1).max().unwrap_or(0)
    }

    /// Register the command table with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let commands = BotCommand::ALL
            .iter()
            .map(|cmd| Command {
                command: cmd.name().to_string(),
                description: cmd.description().to_string(),
            })
            .collect();

        let url = self.api_url("setMyCommands");
        let request = SetMyCommandsRequest { commands };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!(
                "Failed to register commands: {}",
                error
            )));
        }

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }

    /// Send chat action (typing, upload_photo, etc.)
    pub async fn send_chat_action(&self, chat_id: &str, action: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendChatActionRequest {
            chat_id: String,
            action: String,
        }

        let url = self.api_url("sendChatAction");
        let request = SendChatActionRequest {
            chat_id: chat_id.to_string(),
            action: action.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Chat action error: {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn post_and_read_message_id<T: Serialize>(
        &self,
        method: &str,
        request: &T,
    ) -> Result<String, BotError> {
        #[derive(Deserialize)]
        struct Response {
            result: MessageResult,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let url = self.api_url(method);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result.message_id.to_string())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!(
            "Starting Telegram bot (token: {}...)",
            &self.token[..8.min(self.token.len())]
        );
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest {
            chat_id: String,
            text: String,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);
        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        };
        self.post_and_read_message_id("sendMessage", &request).await
    }

    async fn send_photo(&self, chat_id: &str, url: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendPhotoRequest {
            chat_id: String,
            photo: String,
        }

        tracing::debug!("Sending photo to {}: {}", chat_id, url);
        let _ = self.send_chat_action(chat_id, "upload_photo").await;

        let request = SendPhotoRequest {
            chat_id: chat_id.to_string(),
            photo: url.to_string(),
        };
        self.post_and_read_message_id("sendPhoto", &request).await
    }

    async fn send_with_keyboard(
        &self,
        chat_id: &str,
        text: &str,
        buttons: Vec<Vec<KeyboardButton>>,
    ) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest {
            chat_id: String,
            text: String,
            reply_markup: ReplyKeyboardMarkup,
        }

        #[derive(Serialize)]
        struct ReplyKeyboardMarkup {
            keyboard: Vec<Vec<ReplyButton>>,
            one_time_keyboard: bool,
            resize_keyboard: bool,
        }

        #[derive(Serialize)]
        struct ReplyButton {
            text: String,
        }

        tracing::debug!("Sending with keyboard to {}: {}", chat_id, text);
        let keyboard = buttons
            .iter()
            .map(|row| {
                row.iter()
                    .map(|btn| ReplyButton {
                        text: btn.text.clone(),
                    })
                    .collect()
            })
            .collect();

        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            reply_markup: ReplyKeyboardMarkup {
                keyboard,
                one_time_keyboard: true,
                resize_keyboard: true,
            },
        };
        self.post_and_read_message_id("sendMessage", &request).await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
