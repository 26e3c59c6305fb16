//! Error types for SkyLink core library.

/// Errors raised by the tracking pipeline and its ambient layers.
///
/// Transport failures (network, HTTP status) are owned by `skylink-client`;
/// this enum covers everything that can be decided without I/O plus the
/// application-level failure the carrier embeds in a successful response.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// User-supplied input was rejected before any network call.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Field that failed validation, if known
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// The carrier answered successfully at the HTTP level but flagged the
    /// lookup as failed inside the envelope.
    #[error("Upstream error: {message}")]
    Upstream {
        /// Message reported by the carrier (or a default)
        message: String,
    },

    /// I/O error (history file, config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl From<confyg::ConfigError> for Error {
    fn from(err: confyg::ConfigError) -> Self {
        Error::config(err.to_string())
    }
}

/// Convenience `Result` type alias for SkyLink core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// User-facing message for a rejected tracking number.
pub const INVALID_TRACKING_NUMBER: &str = "Please enter a valid tracking number";

/// User-facing message for any failure that is not the caller's fault.
pub const GENERIC_FAILURE: &str = "Failed to fetch tracking information";

impl Error {
    /// Creates a new invalid-input error.
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Error::InvalidInput {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new invalid-input error tied to a field.
    pub fn invalid_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::InvalidInput {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new upstream (application-level) error.
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Error::Upstream {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Whether the caller supplied bad input (maps to a 4xx).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }

    /// Whether the carrier rejected the lookup inside a successful response.
    pub fn is_application(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }

    /// The message shown to an end user.
    ///
    /// Validation and upstream messages are passed through; everything else
    /// collapses to [`GENERIC_FAILURE`].
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidInput { message, .. } => message.clone(),
            Error::Upstream { message } => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
