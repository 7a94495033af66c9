//! Valuation Client Port - Interface to the remote valuation provider.
//!
//! This port abstracts the wholesale-valuation API (environment
//! selection, authentication, and token refresh live behind it), so the
//! session layer can fetch reports without coupling to a vendor.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct MockClient;
//!
//! #[async_trait]
//! impl ValuationClient for MockClient {
//!     async fn fetch(&self, query: &VehicleQuery) -> Result<ValuationReport, ValuationError> {
//!         Ok(ValuationReport::default())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::vehicle::{ValuationReport, VehicleQuery};

/// Port for fetching valuation reports from the remote provider.
///
/// Implementations own credentials and endpoint selection. The core
/// treats every failure here as opaque: it surfaces the error to the
/// user and never retries on its own.
#[async_trait]
pub trait ValuationClient: Send + Sync {
    /// Fetches the valuation report for one query signature.
    async fn fetch(&self, query: &VehicleQuery) -> Result<ValuationReport, ValuationError>;
}

/// Valuation provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValuationError {
    /// Credentials were rejected or a token could not be obtained.
    #[error("authentication with the valuation provider failed")]
    Authentication,

    /// Provider throttled the request.
    #[error("rate limited by the valuation provider")]
    RateLimited,

    /// Provider has no data for this query.
    #[error("no valuation data found for {query}")]
    NotFound {
        /// Human-readable query description.
        query: String,
    },

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape.
    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

impl ValuationError {
    /// Creates a not found error.
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ValuationError::RateLimited | ValuationError::Network(_))
    }
}
