//! Transaction filtering.

use chrono::NaiveDate;

use crate::domain::vehicle::TransactionRecord;

use super::FilterCriteria;

/// Applies filter criteria to transaction sequences.
///
/// The filter is stable: surviving records keep their original relative
/// order. Criteria compose as a logical AND, thresholds are inclusive
/// at the boundary, and a record missing an attribute fails any
/// criterion that targets it.
pub struct FilterEngine;

impl FilterEngine {
    /// Filters `transactions` against `criteria`, resolving relative
    /// date windows against `today`.
    pub fn apply(
        transactions: &[TransactionRecord],
        criteria: &FilterCriteria,
        today: NaiveDate,
    ) -> Vec<TransactionRecord> {
        let cutoff = criteria.sale_window.as_ref().map(|w| w.cutoff(today));
        transactions
            .iter()
            .filter(|tx| Self::matches(tx, criteria, cutoff))
            .cloned()
            .collect()
    }

    fn matches(
        tx: &TransactionRecord,
        criteria: &FilterCriteria,
        cutoff: Option<NaiveDate>,
    ) -> bool {
        if let Some(min_grade) = criteria.min_grade {
            match tx.condition_grade {
                Some(grade) if grade >= min_grade => {}
                _ => return false,
            }
        }
        if let Some(max_odometer) = criteria.max_odometer {
            match tx.odometer {
                Some(odometer) if odometer <= max_odometer => {}
                _ => return false,
            }
        }
        if let Some(cutoff) = cutoff {
            match tx.sale_date {
                Some(date) if date >= cutoff => {}
                _ => return false,
            }
        }
        if !criteria.regions.is_empty() {
            match tx.region {
                Some(region) if criteria.regions.contains(&region) => {}
                _ => return false,
            }
        }
        true
    }
}
