//! Valuation report returned by the provider for one query.

use serde::{Deserialize, Serialize};

use super::TransactionRecord;

/// Identifying attributes of the valued vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleDescription {
    pub year: Option<u16>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub vin: Option<String>,
    pub style: Option<String>,
    pub engine_size: Option<String>,
    pub transmission: Option<String>,
    pub drivetrain: Option<String>,
}

impl VehicleDescription {
    /// One-line "2015 BMW 328i Sport" style title, or None when the
    /// provider sent no year/make/model.
    pub fn title(&self) -> Option<String> {
        match (&self.year, &self.make, &self.model) {
            (Some(year), Some(make), Some(model)) => {
                let mut title = format!("{} {} {}", year, make, model);
                if let Some(trim) = &self.trim {
                    title.push(' ');
                    title.push_str(trim);
                }
                Some(title)
            }
            _ => None,
        }
    }
}

/// A rough/average/clean wholesale price band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub average: Option<f64>,
    pub rough: Option<f64>,
    pub clean: Option<f64>,
}

/// Wholesale value bands reported alongside the transaction history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WholesaleAverages {
    pub aggregate: Option<PriceBand>,
    pub adjusted_mmr: Option<PriceBand>,
    pub base_mmr: Option<PriceBand>,
}

/// Aggregate statistics over the provider's market summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketStatistics {
    pub average_price: Option<f64>,
    pub average_odometer: Option<u32>,
    pub average_condition_grade: Option<f64>,
    pub transaction_count: Option<u32>,
}

/// Complete valuation response for one vehicle query.
///
/// `transactions` preserves provider order, which downstream filtering
/// and pagination treat as canonical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub description: VehicleDescription,
    pub wholesale: Option<WholesaleAverages>,
    pub statistics: Option<MarketStatistics>,
    pub transactions: Vec<TransactionRecord>,
}

impl ValuationReport {
    /// Number of transactions in the report.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}
