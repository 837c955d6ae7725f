//! Calendar dates attached to exercise entries.
//!
//! Dates are plain calendar days (no time of day, no zone). They are rendered
//! in a fixed human-readable form such as `Mon Jan 01 2024` and compared
//! chronologically, never as strings.

use chrono::{DateTime, NaiveDate, Utc};

use fittrack_core::ValueObject;

/// Rendering used in every API response: weekday, month, zero-padded day, year.
pub const DISPLAY_FORMAT: &str = "%a %b %d %Y";

/// Calendar day an exercise was performed on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseDate(NaiveDate);

impl ExerciseDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Current UTC calendar day.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Parse a client-supplied date.
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the UTC day is kept) and the
    /// rendered form (`Mon Jan 01 2024`). Returns `None` for anything else,
    /// including blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(Self(d));
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(ts.with_timezone(&Utc).date_naive()));
        }
        NaiveDate::parse_from_str(raw, DISPLAY_FORMAT).ok().map(Self)
    }

    /// Parse a client-supplied date, falling back to today when it is absent
    /// or unparsable.
    pub fn parse_or_today(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_else(Self::today)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for ExerciseDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl From<ExerciseDate> for NaiveDate {
    fn from(value: ExerciseDate) -> Self {
        value.0
    }
}

impl core::fmt::Display for ExerciseDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl ValueObject for ExerciseDate {}
