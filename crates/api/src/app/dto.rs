use serde::Deserialize;
use serde_json::{Map, Value, json};

use fittrack_exercise::{DurationInput, ExerciseEntry, LogFilter, User};

use crate::app::services::ExerciseLog;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddExerciseRequest {
    pub description: Option<String>,
    pub duration: Option<DurationInput>,
    /// Any JSON value; only strings can name a date.
    pub date: Option<Value>,
}

impl AddExerciseRequest {
    /// The submitted date text. Non-string values count as unparsable and
    /// fall back to today like any other bad date.
    pub fn date_text(&self) -> Option<&str> {
        self.date.as_ref().and_then(Value::as_str)
    }
}

/// `GET /api/users/:_id/logs` query. Values stay raw; unparsable ones are
/// ignored rather than rejected.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl LogQuery {
    /// Collect the known keys from decoded query pairs. A repeated key keeps
    /// its first value; unknown keys are skipped.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "from" => &mut query.from,
                "to" => &mut query.to,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    pub fn to_filter(&self) -> LogFilter {
        LogFilter::lenient(self.from.as_deref(), self.to.as_deref(), self.limit.as_deref())
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn user_to_json(user: &User) -> Value {
    json!({
        "_id": user.id_typed().to_string(),
        "username": user.username().as_str(),
    })
}

pub fn exercise_to_json(user: &User, entry: &ExerciseEntry) -> Value {
    json!({
        "_id": user.id_typed().to_string(),
        "username": user.username().as_str(),
        "description": entry.description().as_str(),
        "duration": entry.duration().get(),
        "date": entry.date().to_string(),
    })
}

pub fn log_entry_to_json(entry: &ExerciseEntry) -> Value {
    json!({
        "description": entry.description().as_str(),
        "duration": entry.duration().get(),
        "date": entry.date().to_string(),
    })
}

pub fn log_to_json(log: &ExerciseLog) -> Value {
    let mut body = Map::new();
    body.insert("_id".into(), log.user.id_typed().to_string().into());
    body.insert("username".into(), log.user.username().as_str().into());
    if let Some(from) = log.filter.from {
        body.insert("from".into(), from.to_string().into());
    }
    if let Some(to) = log.filter.to {
        body.insert("to".into(), to.to_string().into());
    }
    body.insert("count".into(), log.entries.len().into());
    body.insert(
        "log".into(),
        log.entries.iter().map(log_entry_to_json).collect::<Vec<_>>().into(),
    );
    Value::Object(body)
}
