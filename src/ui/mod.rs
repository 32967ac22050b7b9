//! Console presentation: charts and number formatting.

pub mod chart;
mod format;
mod theme;

pub use chart::{ChartRenderer, ChartSpec, InlineChartRenderer};
pub use format::{format_share, format_thousands};
