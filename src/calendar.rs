//! Calendar-day helpers.
//!
//! Every date in this crate is a `NaiveDate` naming a day on the local calendar.
//! Day stepping uses calendar arithmetic, so ranges are unaffected by DST shifts.

use chrono::{Duration, Local, NaiveDate};
use serde::{Serialize, Serializer};
use thiserror::Error;

const ISO_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Invalid(String),

    #[error("range start {start} is after end {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// Closed interval of calendar days with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateError> {
        if start > end {
            return Err(DateError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` calendar days ending at `end`, inclusive.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start: end - Duration::days(span),
            end,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Ascending days of the range.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|day| *day <= self.end).collect()
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("DateRange", 2)?;
        state.serialize_field("start", &date_key(self.start))?;
        state.serialize_field("end", &date_key(self.end))?;
        state.end()
    }
}

pub fn parse_iso(value: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(value.trim(), ISO_FORMAT)
        .map_err(|_| DateError::Invalid(value.to_string()))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Inclusive ascending enumeration of the days from `start_iso` to `end_iso`.
pub fn build_date_range(start_iso: &str, end_iso: &str) -> Result<Vec<NaiveDate>, DateError> {
    let range = DateRange::new(parse_iso(start_iso)?, parse_iso(end_iso)?)?;
    Ok(range.days())
}
