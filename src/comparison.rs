//! Two-station ridership comparison for a single year.
//!
//! Resolves both station patterns, loads their daily series, lines them up on
//! a shared day index and produces the text summary and chart description.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::data::{
    fetch_daily_series, resolve, DailySeries, InvalidYear, Preview, ResolveError, Station,
    Storage, Year,
};
use crate::ui::ChartSpec;

/// Day positions `1..=len` used as the common x-axis for both stations.
///
/// `len` is the number of distinct dates with any ridership in the year across
/// the whole dataset, not the length of either station's series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SharedIndex {
    pub len: usize,
}

impl SharedIndex {
    pub fn positions(&self) -> impl Iterator<Item = usize> {
        1..=self.len
    }
}

/// Shared index plus the text previews of both series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alignment {
    pub index: SharedIndex,
    pub first: Preview,
    pub second: Preview,
}

/// Line up two series of the same year.
///
/// `dataset_days` is the dataset-wide distinct date count for the year.
pub fn align(first: &DailySeries, second: &DailySeries, dataset_days: usize) -> Alignment {
    Alignment {
        index: SharedIndex { len: dataset_days },
        first: first.preview(),
        second: second.preview(),
    }
}

/// Why a comparison was abandoned
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error(transparent)]
    InvalidYear(#[from] InvalidYear),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Outcome of comparing two stations over one year
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub year: Year,
    pub first: DailySeries,
    pub second: DailySeries,
    pub alignment: Alignment,
}

impl Comparison {
    /// Load and align both series for already resolved stations
    pub fn build(
        storage: &Storage,
        year: Year,
        first: &Station,
        second: &Station,
    ) -> anyhow::Result<Self> {
        let first = fetch_daily_series(storage, first, year)?;
        let second = fetch_daily_series(storage, second, year)?;
        let dataset_days = storage.count_ride_dates(year)?;
        if first.len() != dataset_days || second.len() != dataset_days {
            info!(
                %year,
                dataset_days,
                first = first.len(),
                second = second.len(),
                "series lengths differ from the shared index"
            );
        }
        for series in [&first, &second].into_iter().filter(|s| s.is_empty()) {
            info!(%year, station = %series.station, "no ridership for station");
        }
        let alignment = align(&first, &second, dataset_days);
        Ok(Comparison {
            year,
            first,
            second,
            alignment,
        })
    }

    /// Chart of both series against the shared day index
    pub fn chart(&self) -> ChartSpec {
        ChartSpec {
            title: format!("riders each day of {}", self.year),
            x_label: "day".to_string(),
            y_label: "number of riders".to_string(),
            x: self.alignment.index.positions().map(|p| p as f64).collect(),
            series: [&self.first, &self.second]
                .into_iter()
                .map(|s| (s.station.name.clone(), s.values().map(|v| v as f64).collect()))
                .collect(),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            (&self.first.station, &self.alignment.first),
            (&self.second.station, &self.alignment.second),
        ];
        for (number, (station, preview)) in sections.into_iter().enumerate() {
            writeln!(f, "Station {}: {station}", number + 1)?;
            for day in preview.rows() {
                writeln!(f, "{day}")?;
            }
        }
        Ok(())
    }
}

/// Compare two stations, given as name patterns, over one year.
///
/// Station 1 is resolved before station 2 and the first failure ends the
/// comparison.
pub fn compare(
    storage: &Storage,
    first_pattern: &str,
    second_pattern: &str,
    year: &str,
) -> Result<Comparison, CompareError> {
    let year = Year::parse(year)?;
    let first = resolve(storage, first_pattern)?;
    let second = resolve(storage, second_pattern)?;
    Ok(Comparison::build(storage, year, &first, &second)?)
}
