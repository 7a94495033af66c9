//! Pagination module - clamped page navigation.

mod paginator;

pub use paginator::{PageDirection, Paginator};
