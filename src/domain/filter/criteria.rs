//! Filter criteria types.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{Grade, Mileage, Region};

/// Sale-date constraint: either an absolute minimum date or a window
/// relative to the moment the filter is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SaleWindow {
    /// Sales on or after this date pass.
    Since(NaiveDate),
    /// Sales within the last N calendar months pass. The window is
    /// re-anchored to the current date every time the filter runs, so
    /// the same criteria can admit fewer records as time passes.
    LastMonths(u32),
}

impl SaleWindow {
    /// Resolves the window to its inclusive minimum date.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        match self {
            SaleWindow::Since(date) => *date,
            SaleWindow::LastMonths(months) => today
                .checked_sub_months(Months::new(*months))
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

/// Conjunction of optional per-dimension constraints over a transaction
/// set. An absent field imposes no constraint on that dimension; an
/// empty region set likewise admits every region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub min_grade: Option<Grade>,
    pub max_odometer: Option<Mileage>,
    pub sale_window: Option<SaleWindow>,
    pub regions: BTreeSet<Region>,
}

impl FilterCriteria {
    /// Returns true when no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.min_grade.is_none()
            && self.max_odometer.is_none()
            && self.sale_window.is_none()
            && self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_are_empty() {
        assert!(FilterCriteria::default().is_empty());
    }

    #[test]
    fn criteria_with_any_field_are_not_empty() {
        let criteria = FilterCriteria {
            min_grade: Some(Grade::try_new(4.0).unwrap()),
            ..FilterCriteria::default()
        };
        assert!(!criteria.is_empty());

        let mut regions = BTreeSet::new();
        regions.insert(Region::West);
        let criteria = FilterCriteria {
            regions,
            ..FilterCriteria::default()
        };
        assert!(!criteria.is_empty());
    }

    #[test]
    fn since_window_resolves_to_its_own_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(SaleWindow::Since(date).cutoff(today), date);
    }

    #[test]
    fn last_months_window_anchors_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(
            SaleWindow::LastMonths(6).cutoff(today),
            NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()
        );
    }

    #[test]
    fn last_months_window_handles_month_end_clamping() {
        // Going back one month from March 31 lands on the last day of February.
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(
            SaleWindow::LastMonths(1).cutoff(today),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
