//! SQLite storage layer for reading the CTA L daily ridership database.
//!
//! Database schema (only the parts read here):
//! - `Stations` table: Station_ID, Station_Name
//! - `Stops` table: Stop_ID, Station_ID, Stop_Name, ...
//! - `Ridership` table: Station_ID, Ride_Date, Type_of_Day, Num_Riders
//!
//! Every query is parameterized; user input never becomes part of the SQL text.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::debug;

use super::models::{DailyRidership, Station, SystemStats, Year};

const STATIONS_LIKE: &str = "SELECT Station_ID, Station_Name FROM Stations \
     WHERE Station_Name LIKE ?1 ORDER BY Station_Name ASC";

const DAILY_RIDERSHIP: &str = "SELECT strftime('%Y-%m-%d', Ride_Date) AS Day, \
     COALESCE(SUM(Num_Riders), 0) \
     FROM Ridership \
     WHERE Station_ID = ?1 AND strftime('%Y', Ride_Date) = ?2 \
     GROUP BY Day ORDER BY Day ASC";

const COUNT_RIDE_DATES: &str = "SELECT COUNT(DISTINCT strftime('%Y-%m-%d', Ride_Date)) \
     FROM Ridership WHERE strftime('%Y', Ride_Date) = ?1";

const RIDERS_BY_DAY_TYPE: &str = "SELECT SUM(Num_Riders) FROM Ridership WHERE Type_of_Day = ?1";

/// Read a `YYYY-MM-DD` text column into a date
fn get_date(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Read-only handle to the ridership database
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open the database file read-only
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Ridership database not found: {path:?}");
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Failed to open database: {path:?}"))?;
        debug!(?path, "opened ridership database");
        Ok(Storage { conn })
    }

    /// Wrap an existing connection (used with in-memory databases)
    #[cfg(test)]
    pub fn from_connection(conn: Connection) -> Self {
        Storage { conn }
    }

    /// Stations whose name matches a `LIKE` pattern (`_` and `%` wildcards)
    pub fn stations_like(&self, pattern: &str) -> Result<Vec<Station>> {
        let mut stmt = self.conn.prepare(STATIONS_LIKE)?;
        let stations = stmt
            .query_map([pattern], |row| {
                Ok(Station {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to look up stations matching {pattern:?}"))?;
        debug!(pattern, matches = stations.len(), "station lookup");
        Ok(stations)
    }

    /// Riders per date for one station within `year`, ascending by date
    pub fn daily_ridership(&self, station_id: i64, year: Year) -> Result<Vec<DailyRidership>> {
        let mut stmt = self.conn.prepare(DAILY_RIDERSHIP)?;
        let days = stmt
            .query_map(params![station_id, year.to_string()], |row| {
                Ok(DailyRidership {
                    date: get_date(row, 0)?,
                    riders: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| {
                format!("Failed to load ridership for station {station_id} in {year}")
            })?;
        debug!(station_id, %year, days = days.len(), "daily ridership");
        Ok(days)
    }

    /// Number of distinct dates in `year` with any ridership, across all stations
    pub fn count_ride_dates(&self, year: Year) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(COUNT_RIDE_DATES, [year.to_string()], |row| row.get(0))
            .with_context(|| format!("Failed to count ridership dates in {year}"))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Gather the figures shown in the startup banner
    pub fn system_stats(&self) -> Result<SystemStats> {
        let count = |sql: &str| -> Result<i64> {
            self.conn
                .query_row(sql, [], |row| row.get(0))
                .with_context(|| format!("Failed to run {sql:?}"))
        };
        let riders_on = |day_type: &str| -> Result<i64> {
            let sum: Option<i64> = self
                .conn
                .query_row(RIDERS_BY_DAY_TYPE, [day_type], |row| row.get(0))
                .with_context(|| format!("Failed to sum ridership for day type {day_type}"))?;
            Ok(sum.unwrap_or(0))
        };

        let (first_date, last_date): (Option<String>, Option<String>) = self
            .conn
            .query_row(
                "SELECT MIN(strftime('%Y-%m-%d', Ride_Date)), MAX(strftime('%Y-%m-%d', Ride_Date)) \
                 FROM Ridership",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .context("Failed to read ridership date range")?;

        let total_riders: Option<i64> = self
            .conn
            .query_row("SELECT SUM(Num_Riders) FROM Ridership", [], |row| row.get(0))
            .context("Failed to sum ridership")?;

        Ok(SystemStats {
            stations: count("SELECT COUNT(*) FROM Stations")?,
            stops: count("SELECT COUNT(*) FROM Stops")?,
            ride_entries: count("SELECT COUNT(Num_Riders) FROM Ridership")?,
            first_date,
            last_date,
            total_riders: total_riders.unwrap_or(0),
            weekday_riders: riders_on("W")?,
            saturday_riders: riders_on("A")?,
            sunday_holiday_riders: riders_on("U")?,
        })
    }
}
