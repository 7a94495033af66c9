//! Vehicle module - query identity and provider data shapes.

mod query;
mod report;
mod transaction;
mod vin;

pub use query::{LookupKey, VehicleQuery};
pub use report::{
    MarketStatistics, PriceBand, ValuationReport, VehicleDescription, WholesaleAverages,
};
pub use transaction::TransactionRecord;
pub use vin::{Vin, VIN_LENGTH};
