//! Shared error type across polygate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Search-path entry is relative, missing, or unreadable.
    InvalidPath,
    /// A discovered policy unit could not be loaded.
    InvalidDefinition,
    /// Invalid input / malformed configuration.
    BadRequest,
    /// Rate limited.
    RateLimited,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidPath => "INVALID_PATH",
            ClientCode::InvalidDefinition => "INVALID_DEFINITION",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::RateLimited => "RATE_LIMITED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GateError>;

/// Unified error type used by core, loader, and bundled policies.
///
/// Loader errors (`InvalidPath`, `InvalidDefinition`) are construction-time
/// and fatal: no partial registry is ever returned. Pipeline errors
/// (`BadRequest`, `RateLimitExceeded`) travel through `Flow::fail`.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("invalid policy path: {0}")]
    InvalidPath(String),
    #[error("invalid policy definition: {0}")]
    InvalidDefinition(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("rate limit exceeded")]
    RateLimitExceeded,
    #[error("internal: {0}")]
    Internal(String),
}

impl GateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GateError::InvalidPath(_) => ClientCode::InvalidPath,
            GateError::InvalidDefinition(_) => ClientCode::InvalidDefinition,
            GateError::BadRequest(_) => ClientCode::BadRequest,
            GateError::RateLimitExceeded => ClientCode::RateLimited,
            GateError::Internal(_) => ClientCode::Internal,
        }
    }

    /// HTTP status used when the error surfaces on a response.
    pub fn http_status(&self) -> u16 {
        match self {
            GateError::InvalidPath(_) => 500,
            GateError::InvalidDefinition(_) => 500,
            GateError::BadRequest(_) => 400,
            GateError::RateLimitExceeded => 429,
            GateError::Internal(_) => 500,
        }
    }
}
