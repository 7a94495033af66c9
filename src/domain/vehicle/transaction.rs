//! Auction transaction records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Grade, Mileage, Region};

/// One historical auction sale, as reported by the valuation provider.
///
/// Records are immutable once constructed. The order in which the provider
/// returns them is treated as canonical chronological order.
///
/// Every attribute except the sale price is optional: the provider omits
/// fields freely, and a missing field fails any filter criterion that
/// targets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Hammer price in dollars.
    pub price: f64,

    /// Calendar date of the sale.
    pub sale_date: Option<NaiveDate>,

    /// Odometer reading at sale time.
    pub odometer: Option<Mileage>,

    /// Condition grade assigned at inspection.
    pub condition_grade: Option<Grade>,

    /// Market region the sale occurred in.
    pub region: Option<Region>,

    /// Exterior color.
    pub color: Option<String>,

    /// Auction location name.
    pub location: Option<String>,

    /// Auction lane.
    pub lane: Option<String>,

    /// Selling dealer or fleet name.
    pub seller_name: Option<String>,
}

impl TransactionRecord {
    /// Creates a record carrying only a price, with all optional
    /// attributes absent.
    pub fn with_price(price: f64) -> Self {
        Self {
            price,
            sale_date: None,
            odometer: None,
            condition_grade: None,
            region: None,
            color: None,
            location: None,
            lane: None,
            seller_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_price_leaves_optional_attributes_absent() {
        let tx = TransactionRecord::with_price(18_500.0);
        assert_eq!(tx.price, 18_500.0);
        assert!(tx.sale_date.is_none());
        assert!(tx.odometer.is_none());
        assert!(tx.condition_grade.is_none());
        assert!(tx.region.is_none());
    }

    #[test]
    fn transaction_record_serializes_optional_fields() {
        let tx = TransactionRecord {
            sale_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            odometer: Some(Mileage::new(42_000)),
            condition_grade: Some(Grade::try_new(4.2).unwrap()),
            region: Some(Region::Northeast),
            ..TransactionRecord::with_price(21_300.0)
        };

        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("2024-03-15"));
        assert!(json.contains("\"NE\""));
    }
}
