//! Error types for the tweet relay.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Message shown on the login page after any authorization failure.
pub const CREDENTIALS_EXPIRED: &str = "Credentials expired -- please sign in again.";

/// Errors from the remote API layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Credentials rejected by the remote service (401 response), or the
    /// handshake could not proceed.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Reason reported by the service or detected locally
        message: String,
    },

    /// Request understood but refused (403 response)
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Error message from API
        message: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// Rate limited by the remote service (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Form-encoded token response could not be decoded
    #[error("Failed to decode token response: {0}")]
    FormDecode(#[from] serde_urlencoded::de::Error),

    /// Form body could not be encoded
    #[error("Failed to encode request body: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),
}

impl ClientError {
    /// Create an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    /// Create a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if the remote service rejected our credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors that escape a request handler.
///
/// Every variant is recovered the same way: the session is discarded and the
/// user is sent back to the login page (see `server::auth::failure`).
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Handshake or credential failure talking to the remote service.
    #[error("Remote authorization failed: {0}")]
    RemoteAuth(#[from] ClientError),

    /// Anti-forgery token missing or not matching the session.
    #[error("Invalid authenticity token")]
    ForgeryToken,
}

impl AppError {
    /// Shorthand for a locally detected handshake failure.
    #[must_use]
    pub fn remote_auth(message: impl Into<String>) -> Self {
        Self::RemoteAuth(ClientError::unauthorized(message))
    }

    /// Short machine-readable kind, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RemoteAuth(e) if e.is_unauthorized() => "credentials_rejected",
            Self::RemoteAuth(_) => "remote_auth",
            Self::ForgeryToken => "forgery_token",
        }
    }

    /// Wait suggested by the remote service, when it rate limited us.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RemoteAuth(e) => e.retry_after(),
            Self::ForgeryToken => None,
        }
    }

    /// Message queued for the user.
    #[must_use]
    pub const fn to_user_message(&self) -> &'static str {
        CREDENTIALS_EXPIRED
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for request handlers.
pub type AppResult<T> = Result<T, AppError>;
