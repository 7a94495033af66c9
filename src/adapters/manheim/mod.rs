//! Manheim Valuations API Adapter.
//!
//! Implementation of the ValuationClient port against the Manheim
//! wholesale auction API, plus a scriptable mock for tests.

mod client;
mod mock_client;

pub use client::{ManheimClient, ManheimClientConfig};
pub use mock_client::MockValuationClient;
