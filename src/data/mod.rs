//! Data layer for the CTA ridership SQLite database.
//!
//! Handles station lookup, per-station daily series and dataset statistics.

mod models;
mod resolver;
mod series;
mod storage;

#[cfg(test)]
pub(crate) mod fixtures;

pub use models::{DailySeries, InvalidYear, Preview, Station, SystemStats, Year};
pub use resolver::{resolve, ResolveError};
pub use series::fetch_daily_series;
pub use storage::Storage;
