//! Error types for skylink-client

use skylink_core::error::GENERIC_FAILURE;
use thiserror::Error;

/// Result type alias for skylink-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skylink-client
///
/// Transport failures (`Http`, `Status`, `Decode`) are kept apart from the
/// validation and application failures carried by `Core`, so callers can
/// tell "the carrier was unreachable" from "the carrier said no".
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from skylink-core (invalid input, upstream application error, ...)
    #[error(transparent)]
    Core(#[from] skylink_core::Error),

    /// Network failure, timeout, or request construction error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success status
    #[error("Upstream returned HTTP {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The upstream body was not the expected JSON
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        /// Requested URL
        url: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether the failure happened below the application layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Status { .. } | Error::Decode { .. }
        )
    }

    /// Whether the upstream flagged an application-level failure.
    pub fn is_application(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_application())
    }

    /// Whether the caller supplied bad input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_invalid_input())
    }

    /// The message shown to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Error::Core(e) => e.user_message(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
