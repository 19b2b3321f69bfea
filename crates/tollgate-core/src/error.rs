//! Shared error type across Tollgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Auth failed.
    AuthFailed,
    /// Frame names a route no backend integration is registered for.
    UnknownRoute,
    /// Target connection is already closed.
    ConnectionGone,
    /// Backend call failed.
    BackendUnavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::UnknownRoute => "UNKNOWN_ROUTE",
            ClientCode::ConnectionGone => "CONNECTION_GONE",
            ClientCode::BackendUnavailable => "BACKEND_UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TollgateError>;

/// Unified error type used by core and gateway.
///
/// `AuthFailed` deliberately carries no detail: denial reasons are logged
/// server-side and must stay indistinguishable to the caller.
#[derive(Debug, Error)]
pub enum TollgateError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("auth failed")]
    AuthFailed,
    #[error("unknown route: {0}")]
    UnknownRoute(String),
    #[error("connection gone: {0}")]
    ConnectionGone(String),
    #[error("backend call failed: {0}")]
    Backend(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TollgateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TollgateError::BadRequest(_) => ClientCode::BadRequest,
            TollgateError::AuthFailed => ClientCode::AuthFailed,
            TollgateError::UnknownRoute(_) => ClientCode::UnknownRoute,
            TollgateError::ConnectionGone(_) => ClientCode::ConnectionGone,
            TollgateError::Backend(_) => ClientCode::BackendUnavailable,
            TollgateError::Internal(_) => ClientCode::Internal,
        }
    }
}
