use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::store::adapter::StoreError;

/// Error surface of the HTTP layer. Handlers return this and let the
/// `IntoResponse` mapping pick the status code; bodies keep the
/// `{"message": ...}` shape clients already parse.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resource not found.")]
    NotFound,

    #[error("Missing or invalid credentials.")]
    Unauthorized,

    #[error("Operation not permitted.")]
    Forbidden,

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
