//! Telegram transport configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: Option<String>,

    /// Bot API base URL (overridable for self-hosted gateways)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Long-poll timeout in seconds for getUpdates
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    /// Check if the bot token is present
    pub fn has_token(&self) -> bool {
        self.bot_token.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_token() {
            return Err(ValidationError::MissingRequired("TELEGRAM_BOT_TOKEN"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::InvalidTelegramBaseUrl);
        }
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 60 {
            return Err(ValidationError::InvalidPollTimeout);
        }
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base_url: default_api_base_url(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}
