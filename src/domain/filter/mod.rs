//! Filter module - predicate composition over transaction sets.

mod criteria;
mod engine;

pub use criteria::{FilterCriteria, SaleWindow};
pub use engine::FilterEngine;
