// src/server/error.rs
// Maps relay errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::error::RelayError;

/// Generic text shown instead of internal detail in production
pub const GENERIC_ERROR: &str = "Something went wrong";

/// Error response: `{"error": message}` with the given status
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_GATEWAY,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translate a relay failure. In production the detail of unexpected
    /// failures is replaced with [`GENERIC_ERROR`].
    pub fn from_relay(err: RelayError, production: bool) -> Self {
        match err {
            RelayError::InvalidMessage => Self::bad_request(err.to_string()),
            RelayError::EmptyReply { .. } => {
                error!(error = %err, "Upstream returned nothing");
                Self::bad_gateway("Empty response from model")
            }
            other => {
                error!(error = %other, "Chat API error");
                if production {
                    Self::internal(GENERIC_ERROR)
                } else {
                    Self::internal(other.to_string())
                }
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "error": self.message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
