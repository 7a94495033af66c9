//! Trend forecast data shapes.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One calendar month, the fixed bucketing granularity for trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
}

impl Period {
    /// Returns the period containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the next calendar month.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Number of calendar months from `origin` to this period. Negative
    /// when this period precedes the origin.
    pub fn months_since(&self, origin: &Period) -> i64 {
        (self.year as i64 - origin.year as i64) * 12 + (self.month as i64 - origin.month as i64)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Aggregates for one non-empty historical period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub period: Period,
    /// Arithmetic mean sale price over the period's transactions.
    pub average_price: f64,
    /// Mean odometer over transactions that reported one; None when no
    /// transaction in the period carried a reading.
    pub average_mileage: Option<f64>,
    /// Number of transactions in the period.
    pub sample_count: usize,
}

/// One extrapolated future period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub period: Period,
    /// Fitted-line value, not floored at zero, so a falling market can
    /// project negative. Callers treat that as a low-confidence signal.
    pub predicted_price: f64,
}

/// Historical per-period aggregates plus a linear price projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    /// Non-empty historical periods, chronological.
    pub history: Vec<PeriodStats>,
    /// Future periods, chronological, starting the month after the last
    /// historical period.
    pub projection: Vec<ProjectedPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_from_date_extracts_year_and_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(Period::from_date(date), Period { year: 2024, month: 3 });
    }

    #[test]
    fn period_succ_advances_within_a_year() {
        let p = Period { year: 2024, month: 3 };
        assert_eq!(p.succ(), Period { year: 2024, month: 4 });
    }

    #[test]
    fn period_succ_rolls_over_year_boundary() {
        let p = Period { year: 2024, month: 12 };
        assert_eq!(p.succ(), Period { year: 2025, month: 1 });
    }

    #[test]
    fn months_since_counts_calendar_distance() {
        let origin = Period { year: 2024, month: 11 };
        let later = Period { year: 2025, month: 2 };
        assert_eq!(later.months_since(&origin), 3);
        assert_eq!(origin.months_since(&later), -3);
        assert_eq!(origin.months_since(&origin), 0);
    }

    #[test]
    fn period_displays_zero_padded() {
        assert_eq!(format!("{}", Period { year: 2024, month: 3 }), "2024-03");
        assert_eq!(format!("{}", Period { year: 2024, month: 11 }), "2024-11");
    }

    #[test]
    fn period_ordering_is_chronological() {
        let a = Period { year: 2024, month: 12 };
        let b = Period { year: 2025, month: 1 };
        assert!(a < b);
    }
}
