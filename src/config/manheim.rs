//! Manheim API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const PRODUCTION_BASE_URL: &str = "https://api.manheim.com";
const UAT_BASE_URL: &str = "https://uat.api.manheim.com";

/// Manheim valuation API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ManheimConfig {
    /// OAuth2 client ID
    pub client_id: Option<String>,

    /// OAuth2 client secret
    pub client_secret: Option<String>,

    /// Target the UAT (test) environment instead of production
    #[serde(default)]
    pub use_uat: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ManheimConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL for the selected environment
    pub fn base_url(&self) -> &'static str {
        if self.use_uat {
            UAT_BASE_URL
        } else {
            PRODUCTION_BASE_URL
        }
    }

    /// OAuth2 token endpoint for the selected environment
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.base_url())
    }

    /// Check if API credentials are present
    pub fn has_credentials(&self) -> bool {
        self.client_id.as_ref().is_some_and(|v| !v.is_empty())
            && self.client_secret.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Validate Manheim configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.client_id.as_deref().map_or(true, |v| v.is_empty()) {
            return Err(ValidationError::MissingRequired("MANHEIM_CLIENT_ID"));
        }
        if self.client_secret.as_deref().map_or(true, |v| v.is_empty()) {
            return Err(ValidationError::MissingRequired("MANHEIM_CLIENT_SECRET"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ManheimConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            use_uat: false,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
