//! Postgres-backed user and exercise store.
//!
//! ## Schema
//!
//! [`PostgresStore::ensure_schema`] creates two tables if they are missing:
//! `users` (UUID primary key) and `exercises` (append-only, `BIGSERIAL`
//! sequence for insertion order, foreign key to `users`). Exercise dates are
//! stored as SQL `DATE`, so range comparisons are chronological.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (foreign key violation) | `23503` | `UnknownUser` | Exercise insert for a missing owner |
//! | Database (other) | Any other | `Backend` | Constraint or server errors |
//! | PoolClosed / Io / Tls / other | N/A | `Backend` | Connection failures |
//!
//! ## Thread Safety
//!
//! `PostgresStore` is `Send + Sync`; the SQLx pool handles connection sharing.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{FromRow, Row};
use tracing::instrument;
use uuid::Uuid;

use fittrack_core::{DomainError, UserId};
use fittrack_exercise::{
    Description, ExerciseDate, ExerciseEntry, Minutes, NewExercise, User, Username,
};

use super::{ExerciseStore, StoreError, TrackerStore, UserStore};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL CHECK (length(btrim(username)) > 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS exercises (
        seq BIGSERIAL PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users (id),
        description TEXT NOT NULL,
        duration_minutes BIGINT NOT NULL CHECK (duration_minutes >= 0),
        performed_on DATE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS exercises_user_seq_idx ON exercises (user_id, seq)
    "#,
];

/// Persistent store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    #[instrument(skip(database_url), err)]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    async fn user_exists(&self, id: UserId) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("user_exists", e))
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip(self, username), fields(user_id), err)]
    async fn create_user(&self, username: Username) -> Result<User, StoreError> {
        let user = User::register(username);
        tracing::Span::current().record("user_id", tracing::field::display(user.id_typed()));

        sqlx::query("INSERT INTO users (id, username) VALUES ($1, $2)")
            .bind(user.id_typed().as_uuid())
            .bind(user.username().as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_user", e))?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query("SELECT id, username FROM users ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_users", e))?;

        rows.iter()
            .map(|row| {
                UserRow::from_row(row)
                    .map_err(|e| map_sqlx_error("list_users", e))?
                    .into_user()
            })
            .collect()
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?;

        row.map(|row| {
            UserRow::from_row(&row)
                .map_err(|e| map_sqlx_error("get_user", e))?
                .into_user()
        })
        .transpose()
    }
}

#[async_trait]
impl ExerciseStore for PostgresStore {
    #[instrument(skip(self, exercise), fields(user_id = %owner), err)]
    async fn add_exercise(
        &self,
        owner: UserId,
        exercise: NewExercise,
    ) -> Result<ExerciseEntry, StoreError> {
        let entry = ExerciseEntry::new(owner, exercise);

        let result = sqlx::query(
            r#"
            INSERT INTO exercises (user_id, description, duration_minutes, performed_on)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(owner.as_uuid())
        .bind(entry.description().as_str())
        .bind(i64::from(entry.duration().get()))
        .bind(entry.date().as_naive())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(entry),
            Err(e) if is_foreign_key_violation(&e) => Err(StoreError::UnknownUser(owner)),
            Err(e) => Err(map_sqlx_error("add_exercise", e)),
        }
    }

    #[instrument(skip(self), fields(user_id = %owner, entry_count), err)]
    async fn get_exercises(&self, owner: UserId) -> Result<Vec<ExerciseEntry>, StoreError> {
        if !self.user_exists(owner).await? {
            return Err(StoreError::UnknownUser(owner));
        }

        let rows = sqlx::query(
            r#"
            SELECT user_id, description, duration_minutes, performed_on
            FROM exercises
            WHERE user_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_exercises", e))?;

        let entries = rows
            .iter()
            .map(|row| {
                ExerciseRow::from_row(row)
                    .map_err(|e| map_sqlx_error("get_exercises", e))?
                    .into_entry()
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::Span::current().record("entry_count", entries.len());
        Ok(entries)
    }
}

impl TrackerStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {} ({}): {}",
            operation,
            db_err.code().as_deref().unwrap_or("-"),
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::ColumnNotFound(col) | sqlx::Error::ColumnDecode { index: col, .. } => {
            StoreError::Corrupt(format!("column {} in {}", col, operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23503";
        }
    }
    false
}

// SQLx row types

#[derive(Debug)]
struct UserRow {
    id: Uuid,
    username: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, StoreError> {
        let username = Username::parse(&self.username)
            .map_err(|e| StoreError::Corrupt(format!("user {}: {}", self.id, e)))?;
        Ok(User::new(UserId::from_uuid(self.id), username))
    }
}

impl<'r> FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
        })
    }
}

#[derive(Debug)]
struct ExerciseRow {
    user_id: Uuid,
    description: String,
    duration_minutes: i64,
    performed_on: chrono::NaiveDate,
}

impl ExerciseRow {
    fn into_entry(self) -> Result<ExerciseEntry, StoreError> {
        let corrupt = |e: DomainError| {
            StoreError::Corrupt(format!("exercise of user {}: {}", self.user_id, e))
        };
        let description = Description::parse(self.description.clone()).map_err(corrupt)?;
        let duration = Minutes::try_from(self.duration_minutes).map_err(corrupt)?;

        Ok(ExerciseEntry::new(
            UserId::from_uuid(self.user_id),
            NewExercise {
                description,
                duration,
                date: ExerciseDate::new(self.performed_on),
            },
        ))
    }
}

impl<'r> FromRow<'r, PgRow> for ExerciseRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ExerciseRow {
            user_id: row.try_get("user_id")?,
            description: row.try_get("description")?,
            duration_minutes: row.try_get("duration_minutes")?,
            performed_on: row.try_get("performed_on")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::fmt;

    use chrono::NaiveDate;
    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct FakeDbError {
        code: &'static str,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "database error {}", self.code)
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "constraint failed"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { code }))
    }

    fn exercise_row(description: &str, duration_minutes: i64) -> ExerciseRow {
        ExerciseRow {
            user_id: Uuid::now_v7(),
            description: description.to_string(),
            duration_minutes,
            performed_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn foreign_key_violation_is_detected_by_code() {
        assert!(is_foreign_key_violation(&db_error("23503")));
        assert!(!is_foreign_key_violation(&db_error("23505")));
        assert!(!is_foreign_key_violation(&sqlx::Error::PoolClosed));
    }

    #[test]
    fn sqlx_errors_map_to_store_errors() {
        match map_sqlx_error("add_exercise", db_error("23505")) {
            StoreError::Backend(msg) => {
                assert!(msg.contains("add_exercise"));
                assert!(msg.contains("23505"));
            }
            other => panic!("expected backend error, got {other:?}"),
        }
        assert!(matches!(
            map_sqlx_error("list_users", sqlx::Error::PoolClosed),
            StoreError::Backend(_)
        ));
        assert!(matches!(
            map_sqlx_error("get_user", sqlx::Error::ColumnNotFound("username".into())),
            StoreError::Corrupt(_)
        ));
    }

    #[test]
    fn valid_exercise_row_converts() {
        let row = exercise_row("run", 30);
        let owner = UserId::from_uuid(row.user_id);

        let entry = row.into_entry().unwrap();
        assert_eq!(entry.owner(), owner);
        assert_eq!(entry.description().as_str(), "run");
        assert_eq!(entry.duration().get(), 30);
        assert_eq!(entry.date().to_string(), "Mon Jan 01 2024");
    }

    #[test]
    fn negative_duration_row_is_corrupt() {
        assert!(matches!(
            exercise_row("run", -1).into_entry(),
            Err(StoreError::Corrupt(_))
        ));
        assert!(matches!(
            exercise_row("run", i64::from(u32::MAX) + 1).into_entry(),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn blank_description_row_is_corrupt() {
        assert!(matches!(
            exercise_row("   ", 10).into_entry(),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn blank_username_row_is_corrupt() {
        let row = UserRow {
            id: Uuid::now_v7(),
            username: " ".to_string(),
        };
        assert!(matches!(row.into_user(), Err(StoreError::Corrupt(_))));

        let row = UserRow {
            id: Uuid::now_v7(),
            username: "alice".to_string(),
        };
        assert_eq!(row.into_user().unwrap().username().as_str(), "alice");
    }
}
