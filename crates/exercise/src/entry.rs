//! Exercise entries and the validation of new ones.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use fittrack_core::{DomainError, DomainResult, UserId, ValueObject};

use crate::date::ExerciseDate;

/// What was done. Must contain something other than whitespace; the text is
/// otherwise kept exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    pub fn parse(raw: String) -> DomainResult<Self> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Description {}

/// Duration of an exercise in whole minutes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Minutes(u32);

impl Minutes {
    pub fn new(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Minutes {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| {
                DomainError::validation("duration must be a non-negative whole number of minutes")
            })
    }
}

impl FromStr for Minutes {
    type Err = DomainError;

    /// Strict: only decimal digits (surrounding whitespace allowed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(
                "duration must be a non-negative whole number of minutes",
            ));
        }
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| DomainError::validation("duration is too large"))
    }
}

impl core::fmt::Display for Minutes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for Minutes {}

/// Duration as it arrives on the wire: a JSON number or text (form posts and
/// some JSON clients send `"30"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Whole(i64),
    Text(String),
}

impl TryFrom<DurationInput> for Minutes {
    type Error = DomainError;

    fn try_from(value: DurationInput) -> Result<Self, Self::Error> {
        match value {
            DurationInput::Whole(n) => Self::try_from(n),
            DurationInput::Text(s) => s.parse(),
        }
    }
}

/// A validated request to log an exercise, not yet attached to an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub description: Description,
    pub duration: Minutes,
    pub date: ExerciseDate,
}

impl NewExercise {
    /// Validate raw fields.
    ///
    /// `description` and `duration` are required. A missing, blank or
    /// unparsable `date` becomes today.
    pub fn parse(
        description: Option<String>,
        duration: Option<DurationInput>,
        date: Option<&str>,
    ) -> DomainResult<Self> {
        let description = description
            .ok_or_else(|| DomainError::validation("description is required"))
            .and_then(Description::parse)?;
        let duration = duration
            .ok_or_else(|| DomainError::validation("duration is required"))
            .and_then(Minutes::try_from)?;

        Ok(Self {
            description,
            duration,
            date: ExerciseDate::parse_or_today(date),
        })
    }
}

/// A logged exercise. Belongs to exactly one user and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseEntry {
    owner: UserId,
    description: Description,
    duration: Minutes,
    date: ExerciseDate,
}

impl ExerciseEntry {
    pub fn new(owner: UserId, exercise: NewExercise) -> Self {
        Self {
            owner,
            description: exercise.description,
            duration: exercise.duration,
            date: exercise.date,
        }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn duration(&self) -> Minutes {
        self.duration
    }

    pub fn date(&self) -> ExerciseDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Option<DurationInput> {
        Some(DurationInput::Text(s.to_string()))
    }

    fn expect_validation<T: core::fmt::Debug>(res: DomainResult<T>, needle: &str) {
        match res {
            Err(DomainError::Validation(msg)) => {
                assert!(msg.contains(needle), "message {msg:?} should mention {needle:?}")
            }
            other => panic!("expected validation error mentioning {needle:?}, got {other:?}"),
        }
    }

    #[test]
    fn digit_strings_are_coerced() {
        let ex = NewExercise::parse(Some("run".into()), text(" 30 "), None).unwrap();
        assert_eq!(ex.duration, Minutes::new(30));
        assert_eq!(ex.description.as_str(), "run");
    }

    #[test]
    fn whole_numbers_are_accepted() {
        let ex = NewExercise::parse(Some("swim".into()), Some(DurationInput::Whole(0)), None).unwrap();
        assert_eq!(ex.duration.get(), 0);
    }

    #[test]
    fn non_numeric_duration_is_rejected() {
        for raw in ["abc", "30min", "3.5", "-5", "", "+4"] {
            expect_validation(NewExercise::parse(Some("run".into()), text(raw), None), "duration");
        }
        expect_validation(
            NewExercise::parse(Some("run".into()), Some(DurationInput::Whole(-1)), None),
            "non-negative",
        );
    }

    #[test]
    fn oversized_duration_is_rejected() {
        expect_validation(
            NewExercise::parse(Some("run".into()), text("99999999999"), None),
            "too large",
        );
        expect_validation(
            NewExercise::parse(Some("run".into()), Some(DurationInput::Whole(i64::MAX)), None),
            "duration",
        );
    }

    #[test]
    fn missing_fields_are_rejected() {
        expect_validation(NewExercise::parse(None, text("30"), None), "description");
        expect_validation(NewExercise::parse(Some("  ".into()), text("30"), None), "description");
        expect_validation(NewExercise::parse(Some("run".into()), None, None), "duration");
    }

    #[test]
    fn description_is_kept_verbatim() {
        let ex = NewExercise::parse(Some(" easy run ".into()), text("30"), None).unwrap();
        assert_eq!(ex.description.as_str(), " easy run ");
    }

    #[test]
    fn date_defaults_to_today_when_absent_or_invalid() {
        let today = ExerciseDate::today();
        let ex = NewExercise::parse(Some("run".into()), text("30"), None).unwrap();
        assert_eq!(ex.date, today);
        let ex = NewExercise::parse(Some("run".into()), text("30"), Some("someday")).unwrap();
        assert_eq!(ex.date, today);
    }

    #[test]
    fn explicit_date_is_kept() {
        let ex = NewExercise::parse(Some("run".into()), text("30"), Some("2021-06-15")).unwrap();
        assert_eq!(ex.date.as_naive(), NaiveDate::from_ymd_opt(2021, 6, 15).unwrap());
    }

    #[test]
    fn duration_input_accepts_numbers_and_strings() {
        let n: DurationInput = serde_json::from_str("30").unwrap();
        assert_eq!(n, DurationInput::Whole(30));
        let s: DurationInput = serde_json::from_str("\"30\"").unwrap();
        assert_eq!(s, DurationInput::Text("30".into()));
        assert!(serde_json::from_str::<DurationInput>("30.5").is_err());
    }
}
