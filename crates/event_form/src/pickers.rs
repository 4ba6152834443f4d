//! Modal picker bookkeeping: which picker is open, what the date picker is
//! seeded with, and how confirmed values are rendered into field text.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    Date,
    StartTime,
    EndTime,
}

/// Read-only field that currently holds input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    Date,
    StartTime,
    EndTime,
    Type,
}

impl From<PickerKind> for FocusTarget {
    fn from(kind: PickerKind) -> Self {
        match kind {
            PickerKind::Date => FocusTarget::Date,
            PickerKind::StartTime => FocusTarget::StartTime,
            PickerKind::EndTime => FocusTarget::EndTime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatePickerConfig {
    pub initial_selection: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimePickerConfig {
    pub is_24_hour: bool,
}

impl Default for TimePickerConfig {
    fn default() -> Self {
        Self { is_24_hour: true }
    }
}

pub fn proposed_date(now: DateTime<Utc>, offset: Duration) -> DateTime<Utc> {
    now.checked_add_signed(offset).unwrap_or(now)
}

/// Returns `None` when `pattern` is malformed or asks for fields a date lacks.
pub fn format_date(date: NaiveDate, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}

/// Returns `None` when `pattern` is malformed or asks for fields a time lacks.
pub fn format_time(time: NaiveTime, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", time.format(pattern)).ok()?;
    Some(out)
}
