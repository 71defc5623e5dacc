//! Domain traits - Abstractions for infrastructure implementations

pub mod audit;
pub mod bot;
pub mod images;

pub use audit::FailureLog;
pub use bot::{Bot, BotInfo, KeyboardButton};
pub use images::{BreedImageSource, ImageTarget};
