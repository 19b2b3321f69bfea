//! Callback channel: backend -> gateway push to a specific open connection.
//!
//! Pushes are gated by a grant scoped to exactly the API and stage that
//! issued the connection, never a wildcard across APIs. A push to a closed
//! connection yields `ConnectionGone` — an expected race, not a system
//! error: the peer may disconnect between message production and delivery.

use std::sync::Arc;

use axum::extract::ws::Message;
use bytes::Bytes;

use tollgate_core::error::{Result, TollgateError};
use tollgate_core::policy::{
    Effect, Statement, ACTION_INVOKE, ACTION_MANAGE_CONNECTIONS,
};

use crate::session::SessionRegistry;

/// Permission to push to connections of one API and stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackGrant {
    api_id: String,
    stage: String,
    connections_arn: String,
}

impl CallbackGrant {
    pub fn new(api_id: String, stage: String, connections_arn: String) -> Self {
        Self {
            api_id,
            stage,
            connections_arn,
        }
    }

    /// True when a push against `(api_id, stage)` is covered.
    pub fn allows(&self, api_id: &str, stage: &str) -> bool {
        self.api_id == api_id && self.stage == stage
    }

    /// Policy statements this grant amounts to: manage-connection and
    /// invoke actions against the issuing API/stage only.
    pub fn statements(&self) -> Vec<Statement> {
        [ACTION_MANAGE_CONNECTIONS, ACTION_INVOKE]
            .into_iter()
            .map(|action| Statement {
                action: action.to_string(),
                effect: Effect::Allow,
                resource: self.connections_arn.clone(),
            })
            .collect()
    }
}

/// Delivers backend-produced payloads to open connections.
pub struct CallbackChannel {
    registry: Arc<SessionRegistry>,
}

impl CallbackChannel {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Push `payload` to `connection_id`. Success has no body; a missing or
    /// already-closed connection is `ConnectionGone`.
    pub async fn push(&self, connection_id: &str, payload: Bytes) -> Result<()> {
        let handle = self
            .registry
            .get(connection_id)
            .ok_or_else(|| TollgateError::ConnectionGone(connection_id.to_string()))?;

        // Validate UTF-8 once; deliver text frames as text.
        let message = match std::str::from_utf8(&payload) {
            Ok(s) => Message::Text(s.to_owned()),
            Err(_) => Message::Binary(payload.to_vec()),
        };

        handle
            .tx
            .send(message)
            .await
            .map_err(|_| TollgateError::ConnectionGone(connection_id.to_string()))
    }
}
