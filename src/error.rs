use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::StoreError;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Any error: {0:?}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Store error: {0:?}")]
    Store(#[from] StoreError),

    #[error("JWT error: {0:?}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid request: {0:?}")]
    Validation(#[from] validator::ValidationErrors),
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self, "request failed");

        let (status, error_message) = match self {
            AppError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            AppError::Jwt(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, Some(self.to_string())),
            AppError::Store(store_error) => match store_error {
                StoreError::NotFound => (StatusCode::NOT_FOUND, Some(store_error.to_string())),
                StoreError::Sqlx(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            },
        };

        let body = Json(json!({
            "error": error_message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
        }));

        (status, body).into_response()
    }
}
