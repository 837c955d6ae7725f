use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::extract::JsonOrForm;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:_id/exercises", post(add_exercise))
        .route("/:_id/logs", get(get_log))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    JsonOrForm(body): JsonOrForm<dto::CreateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = services.create_user(body.username.as_deref()).await?;
    Ok(Json(dto::user_to_json(&user)))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Value>, ApiError> {
    let users = services.list_users().await?;
    Ok(Json(Value::Array(users.iter().map(dto::user_to_json).collect())))
}

pub async fn add_exercise(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    JsonOrForm(body): JsonOrForm<dto::AddExerciseRequest>,
) -> Result<Json<Value>, ApiError> {
    let date = body.date_text().map(str::to_owned);
    let (user, entry) = services
        .add_exercise(&id, body.description, body.duration, date.as_deref())
        .await?;
    Ok(Json(dto::exercise_to_json(&user, &entry)))
}

pub async fn get_log(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Option<Query<Vec<(String, String)>>>,
) -> Result<Json<Value>, ApiError> {
    // A query string that does not decode is treated as empty.
    let query = dto::LogQuery::from_pairs(query.map(|Query(pairs)| pairs).unwrap_or_default());
    let log = services.get_log(&id, query.to_filter()).await?;
    Ok(Json(dto::log_to_json(&log)))
}
