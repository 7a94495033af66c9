//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Telegram API base URL")]
    InvalidTelegramBaseUrl,

    #[error("Poll timeout must be between 1 and 60 seconds")]
    InvalidPollTimeout,

    #[error("Page size must be at least 1")]
    InvalidPageSize,

    #[error("History capacity must be at least 1")]
    InvalidHistoryCapacity,

    #[error("Idle timeout must be at least 60 seconds")]
    InvalidIdleTimeout,
}
