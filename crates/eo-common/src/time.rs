//! Time handling utilities for acquisition dates.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EoError, EoResult};

/// Return the date minimizing the absolute distance to `target`.
///
/// Ties go to the first date encountered in iteration order; for an
/// increasing series that is the earliest of the tied dates. Returns
/// `None` only when `dates` is empty.
pub fn closest<'a, I>(dates: I, target: DateTime<Utc>) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = &'a DateTime<Utc>>,
{
    let mut best: Option<(DateTime<Utc>, Duration)> = None;
    for date in dates {
        let distance = (*date - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((*date, distance)),
        }
    }
    best.map(|(date, _)| date)
}

/// Position of the first exact match of `value` within `dates`.
///
/// Fails with `DateNotFound` when the date is absent; callers are
/// expected to pass a date taken from the same set, such as the output of
/// [`closest`].
pub fn index_of(dates: &[DateTime<Utc>], value: &DateTime<Utc>) -> EoResult<usize> {
    dates
        .iter()
        .position(|d| d == value)
        .ok_or_else(|| EoError::DateNotFound(value.to_rfc3339()))
}

/// Parse an ISO 8601 timestamp, a naive datetime (assumed UTC) or a bare date.
pub fn parse_iso8601(s: &str) -> EoResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(EoError::InvalidTime(s.to_string()))
}

/// An inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> EoResult<Self> {
        if start > end {
            return Err(EoError::InvalidTime(format!(
                "range start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a "start/end" window, e.g. "2023-01-01/2023-12-31".
    pub fn parse(s: &str) -> EoResult<Self> {
        let (start, end) = s
            .split_once('/')
            .ok_or_else(|| EoError::InvalidTime(format!("expected 'start/end', got '{}'", s)))?;
        Self::new(parse_iso8601(start)?, parse_iso8601(end)?)
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }
}
