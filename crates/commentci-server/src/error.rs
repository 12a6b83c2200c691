//! API error handling.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<commentci_core::Error> for ApiError {
    fn from(err: commentci_core::Error) -> Self {
        match err {
            commentci_core::Error::InvalidInput(_)
            | commentci_core::Error::InvalidTriggerPattern { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            commentci_core::Error::CollaboratorLookup(_) => ApiError::Internal(err.to_string()),
        }
    }
}
