//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `manheim` - Manheim Valuations API client
//! - `chart` - QuickChart trend-chart rendering
//! - `telegram` - Telegram Bot API transport

pub mod chart;
pub mod manheim;
pub mod telegram;
