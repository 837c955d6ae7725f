use axum::{routing::get, Router};

pub mod system;
pub mod users;

/// Router for the public pages and the `/api` surface.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::landing_page))
        .route("/health", get(system::health))
        .nest("/api/users", users::router())
}
