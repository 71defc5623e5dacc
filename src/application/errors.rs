//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Image fetch errors, classified from the remote API response
#[derive(Error, Debug)]
pub enum FetchError {
    /// Remote answered 404 - the breed is unknown to the API
    #[error("breed not found upstream")]
    NotFound,

    /// Remote answered something other than 200 or 404
    #[error("upstream error: status {status}")]
    Upstream { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Breed catalog load errors. Fatal at startup.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
