//! The timestamp segment: `YYYY-MM-DD-HH-mm-ss-SSS-ZHHMM`.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use regex::Regex;
use sp_error::FilenameError;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::filename::timestamp_pattern;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", timestamp_pattern())).expect("timestamp pattern compiles")
});

/// Fields of a timestamp segment.
///
/// Parsing follows the filename grammar, so values such as month 19 are
/// accepted here; [`MHealthTimestamp::to_datetime`] is where calendar
/// validity is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MHealthTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    /// Offset from UTC in minutes (`P` positive, `M` negative)
    pub offset_minutes: i32,
    /// Written with `M`; keeps `M0000` apart from `P0000`
    pub negative_offset: bool,
}

impl MHealthTimestamp {
    /// Parse a timestamp segment.
    pub fn parse(segment: &str) -> Result<Self, FilenameError> {
        if !TIMESTAMP.is_match(segment) {
            return Err(FilenameError::InvalidTimestamp(segment.to_string()));
        }

        let invalid = || FilenameError::InvalidTimestamp(segment.to_string());
        let parts: Vec<&str> = segment.split('-').collect();
        let [year, month, day, hour, minute, second, millis, zone] = parts[..] else {
            return Err(invalid());
        };

        let negative_offset = zone.starts_with('M');
        let sign = if negative_offset { -1 } else { 1 };
        let offset_hours: i32 = zone[1..3].parse().map_err(|_| invalid())?;
        let offset_mins: i32 = zone[3..5].parse().map_err(|_| invalid())?;

        Ok(Self {
            year: year.parse().map_err(|_| invalid())?,
            month: month.parse().map_err(|_| invalid())?,
            day: day.parse().map_err(|_| invalid())?,
            hour: hour.parse().map_err(|_| invalid())?,
            minute: minute.parse().map_err(|_| invalid())?,
            second: second.parse().map_err(|_| invalid())?,
            millisecond: millis.parse().map_err(|_| invalid())?,
            offset_minutes: sign * (offset_hours * 60 + offset_mins),
            negative_offset,
        })
    }

    /// Build from a date-time, keeping its offset.
    pub fn from_datetime(dt: &DateTime<FixedOffset>) -> Self {
        let offset_minutes = dt.offset().local_minus_utc() / 60;
        Self {
            year: dt.year().clamp(0, u16::MAX as i32) as u16,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            millisecond: (dt.nanosecond() / 1_000_000).min(999) as u16,
            offset_minutes,
            negative_offset: offset_minutes < 0,
        }
    }

    /// Calendar date-time, or `None` when a field is outside the calendar
    /// (the grammar admits e.g. month 19 or hour 29).
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.offset_minutes * 60)?;
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_milli_opt(
                self.hour as u32,
                self.minute as u32,
                self.second as u32,
                self.millisecond as u32,
            )?
            .and_local_timezone(offset)
            .single()
    }
}

impl std::fmt::Display for MHealthTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.negative_offset || self.offset_minutes < 0 {
            'M'
        } else {
            'P'
        };
        let offset = self.offset_minutes.unsigned_abs();
        write!(
            f,
            "{:04}-{:02}-{:02}-{:02}-{:02}-{:02}-{:03}-{}{:02}{:02}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.millisecond,
            sign,
            offset / 60,
            offset % 60
        )
    }
}

impl FromStr for MHealthTimestamp {
    type Err = FilenameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
