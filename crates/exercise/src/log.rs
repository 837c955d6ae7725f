//! Log filtering: the `from` / `to` / `limit` view over a user's exercises.
//!
//! Query parameters are handled leniently. A bound that does not parse as a
//! date is treated as absent, and a `limit` that is not a positive integer is
//! ignored. Neither is a validation error.

use crate::date::ExerciseDate;
use crate::entry::ExerciseEntry;

/// Parsed log query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Inclusive lower bound.
    pub from: Option<ExerciseDate>,
    /// Inclusive upper bound.
    pub to: Option<ExerciseDate>,
    /// Keep at most this many entries (always > 0 when set).
    pub limit: Option<usize>,
}

impl LogFilter {
    /// Build a filter from raw query values, dropping anything unparsable.
    pub fn lenient(from: Option<&str>, to: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            from: from.and_then(ExerciseDate::parse),
            to: to.and_then(ExerciseDate::parse),
            limit: limit.and_then(parse_limit),
        }
    }

    pub fn admits(&self, date: ExerciseDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Apply the filter, preserving the order of `entries`.
    pub fn apply(&self, entries: &[ExerciseEntry]) -> Vec<ExerciseEntry> {
        entries
            .iter()
            .filter(|e| self.admits(e.date()))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

fn parse_limit(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Filter a user's entries by optional raw `from` / `to` / `limit` values.
pub fn filter_log(
    entries: &[ExerciseEntry],
    from: Option<&str>,
    to: Option<&str>,
    limit: Option<&str>,
) -> Vec<ExerciseEntry> {
    LogFilter::lenient(from, to, limit).apply(entries)
}
