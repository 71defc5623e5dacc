//! Command router - dispatches inbound messages to the five bot commands
//! and drives the sub-breed disambiguation flow.

use std::collections::HashMap;

use crate::application::errors::FetchError;
use crate::application::texts;
use crate::domain::entities::{BotCommand, BreedCatalog, Content, Message};
use crate::domain::traits::{BreedImageSource, FailureLog, ImageTarget, KeyboardButton};

/// Per-conversation flow state. Absent from the session map means `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingSubBreedChoice { breed: String },
}

/// What the router wants sent back to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing - unrecognized input or a silently logged failure.
    None,
    Text(String),
    /// An image URL, relayed as a photo attachment.
    Photo(String),
    /// A prompt with a one-time reply keyboard.
    Keyboard {
        text: String,
        rows: Vec<Vec<KeyboardButton>>,
    },
}

/// Routes messages to command handlers.
///
/// Owns the immutable breed catalog, the image source, the upstream
/// failure log, and one flow slot per conversation. One instance serves
/// the whole process; the update loop feeds it one message at a time.
pub struct Router<S: BreedImageSource> {
    catalog: BreedCatalog,
    source: S,
    failure_log: Box<dyn FailureLog>,
    sessions: HashMap<String, ChatState>,
}

impl<S: BreedImageSource> Router<S> {
    pub fn new(catalog: BreedCatalog, source: S, failure_log: Box<dyn FailureLog>) -> Self {
        Self {
            catalog,
            source,
            failure_log,
            sessions: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &BreedCatalog {
        &self.catalog
    }

    /// Current flow state for a conversation.
    pub fn chat_state(&self, chat_id: &str) -> ChatState {
        self.sessions
            .get(chat_id)
            .cloned()
            .unwrap_or(ChatState::Idle)
    }

    /// Handle one inbound message and produce the reply to relay.
    ///
    /// A pending disambiguation slot consumes the message before any
    /// command dispatch, whatever the message contains.
    pub async fn handle(&mut self, msg: &Message) -> Reply {
        let state = self
            .sessions
            .remove(&msg.chat_id)
            .unwrap_or(ChatState::Idle);

        if let ChatState::AwaitingSubBreedChoice { breed } = state {
            tracing::debug!("[{}] resolving sub-breed choice for {}", msg.chat_id, breed);
            return self.resolve_sub_breed(msg).await;
        }

        match &msg.content {
            Content::Command { name, args } => self.dispatch_command(msg, name, args).await,
            // No echo for plain text outside a disambiguation flow.
            Content::Text(_) => Reply::None,
        }
    }

    async fn dispatch_command(&mut self, msg: &Message, name: &str, args: &[String]) -> Reply {
        let Some(command) = BotCommand::from_name(name) else {
            tracing::debug!("[{}] ignoring unknown command /{}", msg.chat_id, name);
            return Reply::None;
        };

        match command {
            BotCommand::Start => Reply::Text(texts::WELCOME.to_string()),
            BotCommand::Help => Reply::Text(texts::HELP.to_string()),
            BotCommand::All => Reply::Text(self.catalog.render_listing()),
            BotCommand::Dog => self.fetch(msg, ImageTarget::Any).await,
            BotCommand::Breed => self.handle_breed(msg, args).await,
        }
    }

    async fn handle_breed(&mut self, msg: &Message, args: &[String]) -> Reply {
        let [name] = args else {
            return Reply::Text(texts::BREED_USAGE.to_string());
        };
        let breed = name.to_lowercase();

        if !self.catalog.has_breed(&breed) {
            return Reply::Text(texts::NOT_FOUND.to_string());
        }

        let subs = self.catalog.sub_breeds(&breed).unwrap_or(&[]);
        if subs.len() > 1 {
            return self.prompt_sub_breed(msg, &breed);
        }

        self.fetch(msg, ImageTarget::Breed(breed)).await
    }

    /// Send the choice keyboard and arm the one-shot continuation.
    /// A second /breed before the choice arrives replaces the slot.
    fn prompt_sub_breed(&mut self, msg: &Message, breed: &str) -> Reply {
        let subs = self.catalog.sub_breeds(breed).unwrap_or(&[]);
        let buttons: Vec<KeyboardButton> = subs
            .iter()
            .map(|sub| KeyboardButton::new(format!("{} {}", sub, breed)))
            .collect();
        let rows = buttons.chunks(2).map(|row| row.to_vec()).collect();

        self.sessions.insert(
            msg.chat_id.clone(),
            ChatState::AwaitingSubBreedChoice {
                breed: breed.to_string(),
            },
        );

        Reply::Keyboard {
            text: texts::SELECT_SUB_BREED.to_string(),
            rows,
        }
    }

    /// The choice labels read "<sub> <breed>", so the answer splits
    /// positionally into (sub, breed). Anything else abandons the flow.
    async fn resolve_sub_breed(&mut self, msg: &Message) -> Reply {
        let tokens: Vec<&str> = msg.raw_text.split_whitespace().collect();
        let [sub, breed] = tokens.as_slice() else {
            return Reply::Text(texts::WRONG_INPUT.to_string());
        };

        let target = ImageTarget::SubBreed {
            breed: breed.to_string(),
            sub: sub.to_string(),
        };
        self.fetch(msg, target).await
    }

    async fn fetch(&self, msg: &Message, target: ImageTarget) -> Reply {
        match self.source.random_image(&target).await {
            Ok(url) => {
                tracing::info!("[{}] image for {}: {}", msg.chat_id, target, url);
                Reply::Photo(url)
            }
            Err(FetchError::NotFound) => Reply::Text(texts::NOT_FOUND.to_string()),
            Err(FetchError::Upstream { status }) => {
                tracing::warn!("[{}] upstream error {} for {}", msg.chat_id, status, target);
                self.failure_log.record(&msg.raw_text, status);
                Reply::None
            }
            Err(e) => {
                tracing::error!("[{}] image fetch failed: {}", msg.chat_id, e);
                Reply::None
            }
        }
    }
}
