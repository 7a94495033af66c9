//! Price trend aggregation and linear forecasting.

use std::collections::BTreeMap;

use crate::domain::vehicle::TransactionRecord;

use super::{Period, PeriodStats, ProjectedPoint, TrendError, TrendForecast};

/// Minimum number of non-empty historical periods needed to fit a line.
pub const MIN_TREND_PERIODS: usize = 2;

/// Aggregates transactions into monthly buckets and extrapolates prices.
///
/// Works over the full (unfiltered) transaction history: trends describe
/// the market, not the user's current filtered view.
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Produces a forecast with `horizon` future periods.
    ///
    /// Transactions are bucketed by the calendar month of their sale
    /// date (records without a date cannot be bucketed and are ignored).
    /// The projection is an ordinary-least-squares line over
    /// (month index, mean price), where the index counts calendar months
    /// from the first non-empty bucket so that gaps in the history still
    /// advance the regressor.
    ///
    /// # Edge Cases
    /// - `horizon` of 0: `InvalidHorizon`
    /// - Fewer than 2 non-empty periods: `InsufficientData`
    /// - Falling markets can project negative prices; values are
    ///   returned as fitted, never floored
    pub fn forecast(
        transactions: &[TransactionRecord],
        horizon: u32,
    ) -> Result<TrendForecast, TrendError> {
        if horizon == 0 {
            return Err(TrendError::InvalidHorizon);
        }

        let history = Self::monthly_stats(transactions);
        if history.len() < MIN_TREND_PERIODS {
            return Err(TrendError::InsufficientData {
                required: MIN_TREND_PERIODS,
                actual: history.len(),
            });
        }

        let origin = history[0].period;
        let points: Vec<(f64, f64)> = history
            .iter()
            .map(|stats| {
                (
                    stats.period.months_since(&origin) as f64,
                    stats.average_price,
                )
            })
            .collect();
        let (slope, intercept) = Self::fit_line(&points);

        let last = history[history.len() - 1].period;
        let last_index = last.months_since(&origin);
        let mut projection = Vec::with_capacity(horizon as usize);
        let mut period = last;
        for step in 1..=horizon as i64 {
            period = period.succ();
            projection.push(ProjectedPoint {
                period,
                predicted_price: intercept + slope * (last_index + step) as f64,
            });
        }

        Ok(TrendForecast {
            history,
            projection,
        })
    }

    /// Buckets transactions into chronological monthly aggregates,
    /// skipping empty months and records without a sale date.
    pub fn monthly_stats(transactions: &[TransactionRecord]) -> Vec<PeriodStats> {
        let mut buckets: BTreeMap<Period, Vec<&TransactionRecord>> = BTreeMap::new();
        for tx in transactions {
            if let Some(date) = tx.sale_date {
                buckets.entry(Period::from_date(date)).or_default().push(tx);
            }
        }

        buckets
            .into_iter()
            .map(|(period, txs)| {
                let count = txs.len();
                let average_price = txs.iter().map(|tx| tx.price).sum::<f64>() / count as f64;
                let mileages: Vec<f64> = txs
                    .iter()
                    .filter_map(|tx| tx.odometer.map(|m| m.miles() as f64))
                    .collect();
                let average_mileage = if mileages.is_empty() {
                    None
                } else {
                    Some(mileages.iter().sum::<f64>() / mileages.len() as f64)
                };
                PeriodStats {
                    period,
                    average_price,
                    average_mileage,
                    sample_count: count,
                }
            })
            .collect()
    }

    /// Ordinary least squares over (x, y) pairs, returning (slope, intercept).
    ///
    /// Caller guarantees at least two points with distinct x values, so
    /// the denominator never vanishes.
    fn fit_line(points: &[(f64, f64)]) -> (f64, f64) {
        let n = points.len() as f64;
        let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
        let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
        let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();

        let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
        let intercept = (sum_y - slope * sum_x) / n;
        (slope, intercept)
    }
}
