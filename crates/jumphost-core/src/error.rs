//! Error types for jump host operations.
//!
//! One enum covers both the jump host conventions (missing configuration, an
//! existing or missing droplet, an unresolvable image) and the transport errors
//! raised by the DigitalOcean client. Transport errors are produced once by the
//! client and travel through `?` untouched.

use thiserror::Error;

/// Main error type for jump host operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A client was requested before an API token was configured
    #[error("API token not set")]
    TokenNotSet,

    /// A droplet name was derived before a name format was configured
    #[error("droplet name format not set")]
    NameFormatNotSet,

    /// Deploy found a droplet with the canonical name already present
    #[error("droplet already exists: {0}")]
    Exists(String),

    /// No droplet with the canonical name exists
    #[error("droplet not deployed: {0}")]
    NotDeployed(String),

    /// No private image could be resolved for a deploy
    #[error("no image found: {0}")]
    NoImageFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Request timed out
    #[error("Timeout waiting for API: {0}")]
    Timeout(String),

    /// API is unavailable or rate limiting
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Resource not found on the remote side
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected, usually an authentication failure
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Response body could not be decoded
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

/// Specialized result type for jump host operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenNotSet => "TOKEN_NOT_SET",
            Self::NameFormatNotSet => "NAME_FORMAT_NOT_SET",
            Self::Exists(_) => "EXISTS",
            Self::NotDeployed(_) => "NOT_DEPLOYED",
            Self::NoImageFound(_) => "NO_IMAGE_FOUND",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ParseError(_) => "PARSE_ERROR",
        }
    }

    /// Returns true for errors raised by the jump host conventions rather
    /// than by the API or its transport.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::TokenNotSet
                | Self::NameFormatNotSet
                | Self::Exists(_)
                | Self::NotDeployed(_)
                | Self::NoImageFound(_)
                | Self::ConfigError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
