//! Trend module - monthly aggregation and price forecasting.

mod analyzer;
mod errors;
mod forecast;

pub use analyzer::{TrendAnalyzer, MIN_TREND_PERIODS};
pub use errors::TrendError;
pub use forecast::{Period, PeriodStats, ProjectedPoint, TrendForecast};
