//! Suppression schedule timestamps and the typed recurrence.
//!
//! The API stores a schedule instant as separate UTC `MM/DD/YYYY` date and
//! `HH:MM:SS` time strings; declarations use one RFC3339 timestamp.
//! Splitting and joining is lossless at second precision. Sub-second digits
//! are dropped and offsets are normalised to UTC.

use ar_core::{Error, RecurrenceType, Result, SuppressionConfig, SuppressionSchedule};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::collections::BTreeSet;

/// Date layout of `startDate`/`endDate`.
pub const DATE_LAYOUT: &str = "%m/%d/%Y";

/// Time layout of `startTime`/`endTime`.
pub const TIME_LAYOUT: &str = "%H:%M:%S";

/// Parse an RFC3339 timestamp and normalise it to UTC.
pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Validation(format!("{value:?} is not a valid RFC3339 timestamp: {e}")))
}

/// Split an RFC3339 timestamp into the API's `(date, time)` pair.
pub fn split_timestamp(value: &str) -> Result<(String, String)> {
    let instant = parse_rfc3339(value)?;
    Ok(split_instant(&instant))
}

fn split_instant(instant: &DateTime<Utc>) -> (String, String) {
    (
        instant.format(DATE_LAYOUT).to_string(),
        instant.format(TIME_LAYOUT).to_string(),
    )
}

/// Join an API `(date, time)` pair, read as UTC, into an RFC3339 timestamp.
pub fn join_timestamp(date: &str, time: &str) -> Result<String> {
    let layout = format!("{DATE_LAYOUT} {TIME_LAYOUT}");
    let naive = NaiveDateTime::parse_from_str(&format!("{date} {time}"), &layout)
        .map_err(|e| Error::Parse(format!("invalid schedule date/time {date:?} {time:?}: {e}")))?;
    Ok(Utc
        .from_utc_datetime(&naive)
        .to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Start and end of a suppression window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(Error::Validation(format!(
                "`end_date_utc` ({}) must not be before `start_date_utc` ({})",
                end.to_rfc3339_opts(SecondsFormat::Secs, true),
                start.to_rfc3339_opts(SecondsFormat::Secs, true)
            )));
        }
        Ok(Self { start, end })
    }

    fn to_schedule(self, recurrence_values: Vec<i32>) -> SuppressionSchedule {
        let (start_date, start_time) = split_instant(&self.start);
        let (end_date, end_time) = split_instant(&self.end);
        SuppressionSchedule {
            start_date: Some(start_date),
            end_date: Some(end_date),
            start_time: Some(start_time),
            end_time: Some(end_time),
            recurrence_values,
        }
    }
}

/// A validated suppression recurrence; one variant per recurrence type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    Always,
    Once(Window),
    Daily(Window),
    /// Weekday indices, Sunday = 0.
    Weekly { window: Window, days: BTreeSet<i32> },
    /// Days of the month, 1..=31.
    Monthly { window: Window, days: BTreeSet<i32> },
}

impl Recurrence {
    pub fn recurrence_type(&self) -> RecurrenceType {
        match self {
            Recurrence::Always => RecurrenceType::Always,
            Recurrence::Once(_) => RecurrenceType::Once,
            Recurrence::Daily(_) => RecurrenceType::Daily,
            Recurrence::Weekly { .. } => RecurrenceType::Weekly,
            Recurrence::Monthly { .. } => RecurrenceType::Monthly,
        }
    }

    /// Wire form of this recurrence.
    pub fn to_config(&self) -> SuppressionConfig {
        let schedule = match self {
            Recurrence::Always => None,
            Recurrence::Once(window) | Recurrence::Daily(window) => {
                Some(window.to_schedule(Vec::new()))
            }
            Recurrence::Weekly { window, days } | Recurrence::Monthly { window, days } => {
                Some(window.to_schedule(days.iter().copied().collect()))
            }
        };

        SuppressionConfig {
            recurrence_type: self.recurrence_type(),
            schedule,
        }
    }
}
