//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ValuationClient` - Port for fetching valuation reports
//! - `ChartRenderer` - Port for rendering price-trend charts

mod chart_renderer;
mod valuation_client;

pub use chart_renderer::{ChartArtifact, ChartError, ChartRenderer};
pub use valuation_client::{ValuationClient, ValuationError};
