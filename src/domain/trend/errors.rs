//! Trend-specific error types.

use thiserror::Error;

/// Errors from trend aggregation and forecasting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrendError {
    /// Forecast horizon must be a positive number of periods.
    #[error("Forecast horizon must be at least 1 period")]
    InvalidHorizon,

    /// Too few non-empty historical periods to fit a trend line.
    #[error("Need at least {required} months of sales history to forecast, got {actual}")]
    InsufficientData { required: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_names_the_shortfall() {
        let err = TrendError::InsufficientData {
            required: 2,
            actual: 1,
        };
        assert_eq!(
            format!("{}", err),
            "Need at least 2 months of sales history to forecast, got 1"
        );
    }
}
