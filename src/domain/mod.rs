//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `vehicle` - Query signatures and valuation report types
//! - `refine` - Refinement fields and parameter validation
//! - `filter` - Client-side transaction filtering
//! - `pagination` - Clamped page navigation
//! - `trend` - Monthly price aggregation and linear forecasting
//! - `session` - Per-user conversation state and lifecycle

pub mod filter;
pub mod foundation;
pub mod pagination;
pub mod refine;
pub mod session;
pub mod trend;
pub mod vehicle;
