//! Per-connection facts and the connection lifecycle state machine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TollgateError};

/// Gateway-supplied per-connection facts not derivable from the token.
/// Assigned on connect, stable for the socket's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionMetadata {
    /// Opaque id, unique per open socket. Never reused.
    pub connection_id: String,
    /// Gateway domain the socket connected through.
    pub domain_name: String,
    /// Deployment stage the socket connected through.
    pub stage: String,
}

/// Lifecycle states of one connection.
///
/// `Pending -> Connected` happens only on an allow plus a successful connect
/// dispatch; `Connected -> Closed` is terminal and one-way. A denied attempt
/// never leaves `Pending` (the connection never existed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Pending,
    Connected,
    Closed,
}

impl ConnectionState {
    /// Transition `Pending -> Connected`.
    pub fn connect(self) -> Result<Self> {
        match self {
            ConnectionState::Pending => Ok(ConnectionState::Connected),
            other => Err(TollgateError::Internal(format!(
                "invalid transition: {other:?} -> Connected"
            ))),
        }
    }

    /// Transition `Connected -> Closed`.
    pub fn close(self) -> Result<Self> {
        match self {
            ConnectionState::Connected => Ok(ConnectionState::Closed),
            other => Err(TollgateError::Internal(format!(
                "invalid transition: {other:?} -> Closed"
            ))),
        }
    }
}
