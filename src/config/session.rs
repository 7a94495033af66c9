//! Session lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Transactions shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum retained past queries per session
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Seconds of inactivity before a session is reclaimed
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl SessionConfig {
    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page_size == 0 {
            return Err(ValidationError::InvalidPageSize);
        }
        if self.history_capacity == 0 {
            return Err(ValidationError::InvalidHistoryCapacity);
        }
        if self.idle_timeout_secs < 60 {
            return Err(ValidationError::InvalidIdleTimeout);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            history_capacity: default_history_capacity(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

fn default_page_size() -> usize {
    5
}

fn default_history_capacity() -> usize {
    20
}

fn default_idle_timeout() -> u64 {
    1800
}
