//! Data models representing the CTA ridership reference and time series data.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of entries shown at each end of a series preview
pub const PREVIEW_LEN: usize = 5;

/// A station from the `Stations` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.name)
    }
}

/// Error returned when a year is not exactly four ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid year {0:?}: expected four digits, e.g. 2019")]
pub struct InvalidYear(pub String);

/// A calendar year as typed by the user (four digits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Year(u16);

impl Year {
    pub fn parse(input: &str) -> Result<Self, InvalidYear> {
        let trimmed = input.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidYear(input.to_string()));
        }
        trimmed
            .parse()
            .map(Year)
            .map_err(|_| InvalidYear(input.to_string()))
    }

    /// Whether the given date falls inside this year
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == i32::from(self.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for Year {
    type Err = InvalidYear;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Year::parse(s)
    }
}

impl TryFrom<String> for Year {
    type Error = InvalidYear;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Year::parse(&value)
    }
}

impl From<Year> for String {
    fn from(year: Year) -> Self {
        year.to_string()
    }
}

/// Total riders at one station on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyRidership {
    pub date: NaiveDate,
    pub riders: i64,
}

impl fmt::Display for DailyRidership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.riders)
    }
}

/// Reasons a list of days cannot form a [`DailySeries`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// Dates must be strictly increasing
    #[error("dates out of order: {later} does not come after {earlier}")]
    Unordered { earlier: NaiveDate, later: NaiveDate },

    #[error("date {date} is outside of {year}")]
    OutOfYear { date: NaiveDate, year: Year },
}

/// Daily ridership for one station within one year, ascending by date.
///
/// Dates are unique and strictly increasing; every date lies inside `year`.
/// An empty series is valid and simply means the station had no recorded
/// ridership that year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub station: Station,
    pub year: Year,
    days: Vec<DailyRidership>,
}

impl DailySeries {
    pub fn new(
        station: Station,
        year: Year,
        days: Vec<DailyRidership>,
    ) -> Result<Self, SeriesError> {
        for pair in days.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::Unordered {
                    earlier: pair[0].date,
                    later: pair[1].date,
                });
            }
        }
        if let Some(day) = days.iter().find(|d| !year.contains(d.date)) {
            return Err(SeriesError::OutOfYear {
                date: day.date,
                year,
            });
        }
        Ok(DailySeries {
            station,
            year,
            days,
        })
    }

    #[cfg(test)]
    pub fn days(&self) -> &[DailyRidership] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Raw rider counts in date order
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.days.iter().map(|d| d.riders)
    }

    /// First and last [`PREVIEW_LEN`] days.
    ///
    /// The two halves are taken independently, so for series shorter than
    /// `2 * PREVIEW_LEN` the same day can appear in both.
    pub fn preview(&self) -> Preview {
        let n = self.days.len();
        let head = n.min(PREVIEW_LEN);
        let tail = n.saturating_sub(PREVIEW_LEN);
        Preview {
            first: self.days[..head].to_vec(),
            last: self.days[tail..].to_vec(),
        }
    }
}

/// The head and tail of a series shown in text output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub first: Vec<DailyRidership>,
    pub last: Vec<DailyRidership>,
}

impl Preview {
    /// Head then tail, in print order
    pub fn rows(&self) -> impl Iterator<Item = &DailyRidership> {
        self.first.iter().chain(self.last.iter())
    }
}

/// Dataset-wide figures shown in the startup banner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemStats {
    pub stations: i64,
    pub stops: i64,
    pub ride_entries: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub total_riders: i64,
    pub weekday_riders: i64,
    pub saturday_riders: i64,
    pub sunday_holiday_riders: i64,
}

impl SystemStats {
    /// Percentage of total ridership, 0 when there is no ridership at all
    pub fn share(&self, riders: i64) -> f64 {
        if self.total_riders == 0 {
            return 0.0;
        }
        riders as f64 / self.total_riders as f64 * 100.0
    }
}
