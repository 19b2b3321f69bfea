//! Outbound routed requests: lifecycle events mapped to backend calls.
//!
//! Header mapping is the contract here: every routed request for a given
//! connection carries the context established at connect time. Tenant
//! identity appears only on the connect call; later events identify the
//! connection, never re-derive the tenant.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::connection::ConnectionMetadata;
use crate::policy::{AuthorizationDecision, CTX_TENANT_ID};

/// Routing header: connection id, present on every event.
pub const HEADER_CONNECTION_ID: &str = "X-Websocket-ConnectionId";
/// Routing header: gateway domain, message events.
pub const HEADER_DOMAIN: &str = "X-Websocket-Domain";
/// Routing header: deployment stage, message events.
pub const HEADER_STAGE: &str = "X-Websocket-Stage";
/// Routing header: tenant id, connect only.
pub const HEADER_TENANT_ID: &str = "tenantid";

/// One of the three lifecycle events of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Connect,
    Message,
    Disconnect,
}

impl LifecycleEvent {
    /// HTTP method of the backend integration for this event.
    pub fn method(self) -> &'static str {
        match self {
            LifecycleEvent::Connect => "PUT",
            LifecycleEvent::Message => "POST",
            LifecycleEvent::Disconnect => "DELETE",
        }
    }
}

/// The outbound call made to the backend for a lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedRequest {
    pub event: LifecycleEvent,
    pub method: &'static str,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Bytes>,
}

impl RoutedRequest {
    /// Connect call: tenant context from the decision plus the connection id.
    pub fn connect(decision: &AuthorizationDecision, meta: &ConnectionMetadata) -> Self {
        let mut headers = BTreeMap::new();
        if let Some(tenant) = decision.context_value(CTX_TENANT_ID) {
            headers.insert(HEADER_TENANT_ID.to_string(), tenant.to_string());
        }
        headers.insert(
            HEADER_CONNECTION_ID.to_string(),
            meta.connection_id.clone(),
        );
        Self {
            event: LifecycleEvent::Connect,
            method: LifecycleEvent::Connect.method(),
            headers,
            body: None,
        }
    }

    /// Message call: connection id, domain, and stage; frame body verbatim.
    pub fn message(meta: &ConnectionMetadata, body: Bytes) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            HEADER_CONNECTION_ID.to_string(),
            meta.connection_id.clone(),
        );
        headers.insert(HEADER_DOMAIN.to_string(), meta.domain_name.clone());
        headers.insert(HEADER_STAGE.to_string(), meta.stage.clone());
        Self {
            event: LifecycleEvent::Message,
            method: LifecycleEvent::Message.method(),
            headers,
            body: Some(body),
        }
    }

    /// Disconnect call: connection id only. Best-effort by contract.
    pub fn disconnect(meta: &ConnectionMetadata) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            HEADER_CONNECTION_ID.to_string(),
            meta.connection_id.clone(),
        );
        Self {
            event: LifecycleEvent::Disconnect,
            method: LifecycleEvent::Disconnect.method(),
            headers,
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
