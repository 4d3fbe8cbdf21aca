//! Handler failure taxonomy and its HTTP rendering
//!
//! Every failure leaves a handler as a [`HandlerError`] and is rendered as a
//! status code plus a `{"error": "<message>"}` JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// Caller input is absent, malformed or fails validation
    #[error("{0}")]
    BadRequest(String),

    /// A well-formed key has no record
    #[error("{0}")]
    NotFound(String),

    /// The store or another internal component failed
    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
