//! Session module - per-user conversation state and lifecycle.
//!
//! A Session owns the active query, its raw valuation report, the
//! filter layered on top, the page cursor, and the trail of past
//! queries for one user's conversation.

mod aggregate;
mod errors;
mod history;
mod phase;

pub use aggregate::{PageView, Session};
pub use errors::SessionError;
pub use history::QueryHistory;
pub use phase::SessionPhase;
