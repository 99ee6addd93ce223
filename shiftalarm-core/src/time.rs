//! Time utilities: wall-clock parsing, month ranges, and UTC conversion for export.

use anyhow::Result;
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Parse a wall-clock `HH:MM` time of day.
pub fn parse_hhmm(raw: &str) -> Result<NaiveTime, CatalogError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| CatalogError::InvalidTime(raw.to_string()))
}

/// Format a time of day as `HH:MM`.
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Half-open range of wall-clock date-times, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.and_time(NaiveTime::MIN))
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `[first of month 00:00, first of next month 00:00)` for the month containing `date`.
pub fn month_range(date: NaiveDate) -> DateRange {
    let first = month_start(date);
    let next = first
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    DateRange {
        start: first.and_time(NaiveTime::MIN),
        end: next.and_time(NaiveTime::MIN),
    }
}

/// Interpret a wall-clock date-time in an IANA tz like "Asia/Shanghai", returning UTC.
pub fn local_to_utc(local: NaiveDateTime, tz: &str) -> Result<DateTime<Utc>> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;

    let local_dt = tz
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| anyhow::anyhow!("nonexistent local time (DST gap?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}
