//! Error types for the bot core.
//!
//! [`BotError`] is the top-level error; [`HandlerError`] is used for handler
//! failures and [`ApiError`] for platform REST failures.

use thiserror::Error;

/// Platform REST errors. `CategoryFull` is the one failure ticket creation
/// retries against a fallback category.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Category is full")]
    CategoryFull,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Top-level error for the bot (database, platform API, handler, config, IO).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<storage::StorageError> for BotError {
    fn from(e: storage::StorageError) -> Self {
        BotError::Database(e.to_string())
    }
}

/// Errors produced by handlers (missing config, bad interaction payloads,
/// auth, state).
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid interaction: {0}")]
    InvalidInteraction(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("State error: {0}")]
    State(String),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
