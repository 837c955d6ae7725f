use axum::{http::StatusCode, response::Html};

const LANDING_PAGE: &str = include_str!("../static/index.html");

pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
