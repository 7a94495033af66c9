//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LANESCOUT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use lanescout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Targeting {}", config.manheim.base_url());
//! ```

mod error;
mod manheim;
mod session;
mod telegram;

pub use error::{ConfigError, ValidationError};
pub use manheim::ManheimConfig;
pub use session::SessionConfig;
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the lanescout bot.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Telegram transport configuration (bot token, polling)
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Manheim valuation API configuration (credentials, environment)
    #[serde(default)]
    pub manheim: ManheimConfig,

    /// Session engine configuration (paging, history, idle reclamation)
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LANESCOUT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `LANESCOUT__TELEGRAM__BOT_TOKEN=...` -> `telegram.bot_token = ...`
    /// - `LANESCOUT__MANHEIM__USE_UAT=true` -> `manheim.use_uat = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LANESCOUT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.telegram.validate()?;
        self.manheim.validate()?;
        self.session.validate()?;
        Ok(())
    }
}
