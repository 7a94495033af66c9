//! Refinement module - parameter parsing and validation.
//!
//! Refinement progressively narrows a vehicle query: each validated
//! field merges into the query's parameter set and changes its
//! signature, which is what triggers a provider re-fetch upstream.

mod parameters;
mod validator;

pub use parameters::{RefineField, RefinementParameters};
pub use validator::{ParameterValidator, EARLIEST_SALE_DATE};
