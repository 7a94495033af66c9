//! Lanescout - Conversational Vehicle Valuation Engine
//!
//! This crate refines Manheim wholesale valuations over a Telegram
//! conversation: per-user sessions cache one provider report at a time
//! and layer filtering, pagination, and trend forecasting on top.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
