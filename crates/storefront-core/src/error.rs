//! Shared error types across storefront crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Requested row does not exist.
    NotFound,
    /// Uniqueness or integrity violation.
    Conflict,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Conflict => "CONFLICT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl StorefrontError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            StorefrontError::BadRequest(_) => ClientCode::BadRequest,
            StorefrontError::NotFound(_) => ClientCode::NotFound,
            StorefrontError::Conflict(_) => ClientCode::Conflict,
            StorefrontError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            StorefrontError::Internal(_) => ClientCode::Internal,
        }
    }
}

/// Failures inside the metrics registry.
///
/// These never leave the registry: every public metrics operation logs and
/// drops them so instrumentation cannot fail a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("monotonic clock unavailable")]
    ClockUnavailable,
    #[error("timer handle was not issued by this registry")]
    UnknownTimerHandle,
    #[error("active request count would go negative")]
    NegativeActiveCount,
    #[error("gauge {0} rejected a non-finite value")]
    NonFiniteGauge(String),
}
