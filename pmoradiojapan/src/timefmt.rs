//! Canonical broadcast timestamps
//!
//! Every time that leaves this crate is a [`Timestamp`], printed as the
//! 14-digit `YYYYMMDDHHMMSS` form used by radiko. Source-specific formats
//! (ISO-8601 from NHK, `YYYY-MM-DD HH:MM:SS` from the radiko search API) are
//! normalized here, in Japan Standard Time.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical textual format
pub const CANONICAL_FORMAT: &str = "%Y%m%d%H%M%S";

/// Hour at which a radiko broadcast day starts (programs before 05:00 belong
/// to the previous day's schedule)
pub const BROADCAST_DAY_START_HOUR: u32 = 5;

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Japan Standard Time (UTC+9, no daylight saving)
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// A wall-clock instant in JST, second precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Current wall-clock time in JST
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self::from_naive(instant.with_timezone(&jst()).naive_local())
    }

    /// Wraps a JST wall-clock value, dropping sub-second precision
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value.with_nanosecond(0).unwrap_or(value))
    }

    /// Parses the canonical 14-digit form, strictly
    pub fn parse_canonical(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.len() != 14 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidTimestamp(text.to_string()));
        }
        NaiveDateTime::parse_from_str(text, CANONICAL_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidTimestamp(text.to_string()))
    }

    /// Normalizes any supported source format into a timestamp
    ///
    /// Accepted inputs:
    /// - `20260120130000` (canonical)
    /// - `2026-01-20 13:00:00` / `2026/01/20 13:00:00` (radiko search API)
    /// - `2026-01-20T13:00:00+09:00`, `2026-01-20T04:00:00Z` (NHK APIs),
    ///   converted to JST
    pub fn normalize(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidTimestamp(text.to_string()));
        }

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from_naive(
                with_offset.with_timezone(&jst()).naive_local(),
            ));
        }

        let digits: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '/' | ':' | ' ' | 'T'))
            .collect();
        Self::parse_canonical(&digits).map_err(|_| Error::InvalidTimestamp(text.to_string()))
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Calendar date of the radiko schedule that lists this instant
    pub fn broadcast_date(&self) -> NaiveDate {
        let date = self.0.date();
        if self.0.hour() < BROADCAST_DAY_START_HOUR {
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }

    /// Signed duration from `self` to `later`
    pub fn until(&self, later: &Timestamp) -> Duration {
        later.0 - self.0
    }

    /// `HH:MM` for logs
    pub fn hhmm(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

/// Formats a date as the `YYYYMMDD` path segment radiko and NHK use
pub fn yyyymmdd(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_canonical(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_canonical(&text).map_err(serde::de::Error::custom)
    }
}
