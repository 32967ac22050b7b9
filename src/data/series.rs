//! Loads a station's daily ridership for one year.

use anyhow::{Context, Result};

use super::models::{DailySeries, Station, Year};
use super::storage::Storage;

/// Fetch the ascending daily series for `station` within `year`.
///
/// No matching rows is not an error: the result is an empty series.
pub fn fetch_daily_series(storage: &Storage, station: &Station, year: Year) -> Result<DailySeries> {
    let days = storage.daily_ridership(station.id, year)?;
    DailySeries::new(station.clone(), year, days)
        .with_context(|| format!("Inconsistent ridership data for {station} in {year}"))
}
