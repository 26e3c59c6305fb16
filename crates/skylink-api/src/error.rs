//! Error types for skylink-api

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use skylink_core::error::GENERIC_FAILURE;
use thiserror::Error;

/// Body text for a request without a tracking number.
pub const MISSING_TRACKING_NUMBER: &str = "Tracking number is required";

/// Result type alias for skylink-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skylink-api
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// `awbNo` missing or empty
    #[error("Tracking number is required")]
    MissingTrackingNumber,

    /// Error from skylink-client
    #[error(transparent)]
    Client(#[from] skylink_client::Error),

    /// Error from skylink-core
    #[error(transparent)]
    Core(#[from] skylink_core::Error),

    /// Listener or socket failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// User-facing message.
    pub error: String,
}

impl Error {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingTrackingNumber => StatusCode::BAD_REQUEST,
            Error::Core(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body. Upstream details stay in logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::MissingTrackingNumber => MISSING_TRACKING_NUMBER.to_string(),
            Error::Core(e) if e.is_invalid_input() => e.user_message(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
