//! Chart Renderer Adapters.
//!
//! Implementations of the ChartRenderer port. The QuickChart adapter
//! builds a chart URL rather than rendering pixels in-process.

mod quickchart;

pub use quickchart::{QuickChartConfig, QuickChartRenderer};
