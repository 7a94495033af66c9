//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the LaneScout domain.

mod errors;
mod grade;
mod ids;
mod mileage;
mod region;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use grade::Grade;
pub use ids::{SessionId, UserId};
pub use mileage::Mileage;
pub use region::Region;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
