//! Route dispatcher tests against a capturing backend target.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tollgate_core::connection::ConnectionMetadata;
use tollgate_core::error::{Result, TollgateError};
use tollgate_core::policy;
use tollgate_core::route::{
    LifecycleEvent, RoutedRequest, HEADER_CONNECTION_ID, HEADER_STAGE, HEADER_TENANT_ID,
};
use tollgate_gateway::dispatch::{RouteDispatcher, RouteTarget};

#[derive(Default)]
struct CaptureTarget {
    calls: Mutex<Vec<RoutedRequest>>,
}

impl CaptureTarget {
    fn calls(&self) -> Vec<RoutedRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RouteTarget for CaptureTarget {
    async fn call(&self, req: RoutedRequest) -> Result<()> {
        self.calls.lock().unwrap().push(req);
        Ok(())
    }
}

/// Backend that is always unreachable.
struct FailingTarget;

#[async_trait]
impl RouteTarget for FailingTarget {
    async fn call(&self, _req: RoutedRequest) -> Result<()> {
        Err(TollgateError::Backend("connection refused".into()))
    }
}

fn meta() -> ConnectionMetadata {
    ConnectionMetadata {
        connection_id: "1-00ab12cd".into(),
        domain_name: "ws.example.com".into(),
        stage: "production".into(),
    }
}

fn dispatcher(target: Arc<dyn RouteTarget>) -> RouteDispatcher {
    let d = RouteDispatcher::new(target);
    d.register_route("message");
    d
}

#[tokio::test]
async fn connect_then_message_share_connection_and_tenant_context() {
    let target = Arc::new(CaptureTarget::default());
    let d = dispatcher(target.clone());
    let decision = policy::allow("u1", Some("42"), "arn:x");
    let m = meta();

    d.dispatch_connect(&decision, &m).await.unwrap();
    d.dispatch_message(&m, r#"{"action":"message","data":{"n":1}}"#)
        .await
        .unwrap();

    let calls = target.calls();
    assert_eq!(calls.len(), 2);

    assert_eq!(calls[0].event, LifecycleEvent::Connect);
    assert_eq!(calls[0].header(HEADER_TENANT_ID), Some("42"));

    assert_eq!(calls[1].event, LifecycleEvent::Message);
    // Same connection id as established at connect, independent of content.
    assert_eq!(
        calls[1].header(HEADER_CONNECTION_ID),
        calls[0].header(HEADER_CONNECTION_ID)
    );
    assert_eq!(calls[1].header(HEADER_STAGE), Some("production"));
    // Tenant identity is never re-derived on the message path.
    assert_eq!(calls[1].header(HEADER_TENANT_ID), None);
}

#[tokio::test]
async fn message_body_passes_through_verbatim() {
    let target = Arc::new(CaptureTarget::default());
    let d = dispatcher(target.clone());
    let raw = r#"{"action":"message","data":{"text":"hi"},"extra":true}"#;

    d.dispatch_message(&meta(), raw).await.unwrap();

    let calls = target.calls();
    assert_eq!(calls[0].body.as_deref(), Some(raw.as_bytes()));
}

#[tokio::test]
async fn unknown_action_rejected_without_backend_call() {
    let target = Arc::new(CaptureTarget::default());
    let d = dispatcher(target.clone());

    let err = d
        .dispatch_message(&meta(), r#"{"action":"admin-backdoor"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, TollgateError::UnknownRoute(_)));
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn invalid_frame_rejected_without_backend_call() {
    let target = Arc::new(CaptureTarget::default());
    let d = dispatcher(target.clone());

    let err = d.dispatch_message(&meta(), "not json").await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn connect_failure_surfaces() {
    let d = dispatcher(Arc::new(FailingTarget));
    let decision = policy::allow("u1", Some("42"), "arn:x");

    let err = d.dispatch_connect(&decision, &meta()).await.unwrap_err();
    assert!(matches!(err, TollgateError::Backend(_)));
}

#[tokio::test]
async fn message_failure_surfaces() {
    let d = dispatcher(Arc::new(FailingTarget));

    let err = d
        .dispatch_message(&meta(), r#"{"action":"message"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, TollgateError::Backend(_)));
}

#[tokio::test]
async fn disconnect_failure_is_suppressed() {
    let d = dispatcher(Arc::new(FailingTarget));

    // Best-effort path: no error escapes even with the backend down.
    d.dispatch_disconnect(&meta()).await;
}

#[tokio::test]
async fn registered_routes_reflect_config() {
    let d = dispatcher(Arc::new(CaptureTarget::default()));
    d.register_route("typing");

    let mut routes = d.registered_routes();
    routes.sort();
    assert_eq!(routes, vec!["message".to_string(), "typing".to_string()]);
}
