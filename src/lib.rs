//! fetchbot - a Telegram bot relaying dog images from the dog.ceo API

pub mod application;
pub mod domain;
pub mod infrastructure;
