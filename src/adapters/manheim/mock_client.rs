//! Mock valuation client for testing.
//!
//! A scriptable implementation of the ValuationClient port, so tests
//! and offline development can run without provider credentials.
//!
//! # Features
//!
//! - Queued reports served in order
//! - Error injection
//! - Call recording for verification
//!
//! # Example
//!
//! ```ignore
//! let client = MockValuationClient::new().with_report(report);
//!
//! let fetched = client.fetch(&query).await?;
//! assert_eq!(client.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::vehicle::{ValuationReport, VehicleQuery};
use crate::ports::{ValuationClient, ValuationError};

/// Scriptable valuation client.
///
/// Responses are served in the order they were queued. A fetch past the
/// end of the script fails with a network error, so an unexpected extra
/// call surfaces as a test failure instead of silently reusing data.
/// Clones share the same script and call log.
#[derive(Debug, Clone, Default)]
pub struct MockValuationClient {
    script: Arc<Mutex<VecDeque<Result<ValuationReport, ValuationError>>>>,
    calls: Arc<Mutex<Vec<VehicleQuery>>>,
}

impl MockValuationClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a report for the next unanswered fetch.
    pub fn with_report(self, report: ValuationReport) -> Self {
        self.script.lock().unwrap().push_back(Ok(report));
        self
    }

    /// Queues an error for the next unanswered fetch.
    pub fn with_error(self, error: ValuationError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Returns every query fetched so far, in order.
    pub fn calls(&self) -> Vec<VehicleQuery> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns how many fetches were made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ValuationClient for MockValuationClient {
    async fn fetch(&self, query: &VehicleQuery) -> Result<ValuationReport, ValuationError> {
        self.calls.lock().unwrap().push(query.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ValuationError::network("mock script exhausted")))
    }
}
