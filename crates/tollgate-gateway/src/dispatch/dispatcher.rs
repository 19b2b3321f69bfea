//! Registry and dispatcher for the three lifecycle events.
//!
//! Connect and disconnect are fixed shapes. Message routes are selected by
//! the frame's `action` field against a registered route set; an action
//! with no registered route is rejected to the client without a backend
//! call. The routing key is never an authorization signal.

use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashSet;

use tollgate_core::error::{Result, TollgateError};
use tollgate_core::connection::ConnectionMetadata;
use tollgate_core::policy::AuthorizationDecision;
use tollgate_core::protocol::frame;
use tollgate_core::route::RoutedRequest;

use super::target::RouteTarget;

pub struct RouteDispatcher {
    target: Arc<dyn RouteTarget>,
    routes: DashSet<String>,
}

impl RouteDispatcher {
    pub fn new(target: Arc<dyn RouteTarget>) -> Self {
        Self {
            target,
            routes: DashSet::new(),
        }
    }

    pub fn register_route(&self, action: impl Into<String>) {
        self.routes.insert(action.into());
    }

    pub fn registered_routes(&self) -> Vec<String> {
        self.routes.iter().map(|r| r.key().clone()).collect()
    }

    /// Connect call. Must succeed before the socket counts as established;
    /// tenant context is attached here and only here.
    pub async fn dispatch_connect(
        &self,
        decision: &AuthorizationDecision,
        meta: &ConnectionMetadata,
    ) -> Result<()> {
        self.target
            .call(RoutedRequest::connect(decision, meta))
            .await
    }

    /// Message call for one inbound frame. A failure fails this delivery
    /// only; the connection stays up.
    pub async fn dispatch_message(&self, meta: &ConnectionMetadata, raw: &str) -> Result<()> {
        let frame = frame::parse_frame(raw)?;
        if !self.routes.contains(&frame.action) {
            return Err(TollgateError::UnknownRoute(frame.action));
        }
        self.target
            .call(RoutedRequest::message(
                meta,
                Bytes::copy_from_slice(raw.as_bytes()),
            ))
            .await
    }

    /// Disconnect call, best effort. The socket is already gone, so a
    /// failure is logged and suppressed; nothing can be corrected by
    /// surfacing it.
    pub async fn dispatch_disconnect(&self, meta: &ConnectionMetadata) {
        if let Err(e) = self.target.call(RoutedRequest::disconnect(meta)).await {
            tracing::warn!(
                connection_id = %meta.connection_id,
                error = %e,
                "disconnect routing failed"
            );
        }
    }
}
