//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ai::chat::Rejection;
use crate::ai::relay::RelayError;

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(crate::ai::prompt::SERVER_FAILED)),
        )
            .into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Body of every error response: `{"error": "..."}`
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Remote failures keep their classification, only the public message
/// reaches the browser.
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        ErrorResponse::new(self.public_message()).into_response_with(self.status())
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = match self {
            Rejection::Busy => StatusCode::CONFLICT,
            Rejection::NotFound => StatusCode::NOT_FOUND,
            Rejection::Empty | Rejection::NotEditable => StatusCode::UNPROCESSABLE_ENTITY,
        };
        ErrorResponse::new(&self.to_string()).into_response_with(status)
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod sessions {
    pub use crate::api::routes::sessions::public::*;
}
