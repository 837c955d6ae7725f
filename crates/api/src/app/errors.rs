use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use fittrack_core::DomainError;
use fittrack_infra::StoreError;

use crate::app::services::ServiceError;

/// Error surfaced at the HTTP boundary.
///
/// Every variant renders as `{"error": <message>, "code": <kind>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (400).
    #[error("{0}")]
    Validation(String),

    /// Unknown resource (404).
    #[error("{0}")]
    NotFound(String),

    /// Persistence failure (500). Details are logged, not returned.
    #[error("storage failure")]
    Storage(#[source] StoreError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::NotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownUser(_) => Self::NotFound("user not found".to_string()),
            other => Self::Storage(other),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Storage(source) = &self {
            tracing::error!(error = %source, "storage operation failed");
        }
        json_error(self.status(), self.code(), self.to_string())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fittrack_core::UserId;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let err: ApiError = DomainError::validation("username is required").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "username is required");

        let err: ApiError = DomainError::not_found("user").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "user not found");
    }

    #[test]
    fn unknown_user_is_not_found_and_backend_failures_are_500() {
        let err: ApiError = StoreError::UnknownUser(UserId::new()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "not_found");

        let err: ApiError = StoreError::Backend("connection refused".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "storage_error");
        // internal details stay out of the client message
        assert_eq!(err.to_string(), "storage failure");
    }

    #[test]
    fn responses_carry_status() {
        let resp = ApiError::validation("duration is required").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = ApiError::NotFound("user not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
