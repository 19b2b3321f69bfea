//! Callback channel tests: scoped grants and the ConnectionGone race.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::ws::Message;
use bytes::Bytes;
use tokio::sync::mpsc;

use tollgate_core::error::TollgateError;
use tollgate_core::policy::{Effect, ACTION_INVOKE, ACTION_MANAGE_CONNECTIONS};
use tollgate_gateway::callback::{CallbackChannel, CallbackGrant};
use tollgate_gateway::session::{ConnectionHandle, SessionRegistry};

fn context() -> BTreeMap<String, String> {
    let mut ctx = BTreeMap::new();
    ctx.insert("userId".to_string(), "u1".to_string());
    ctx.insert("tenantId".to_string(), "42".to_string());
    ctx
}

#[tokio::test]
async fn push_delivers_to_open_connection() {
    let registry = Arc::new(SessionRegistry::new());
    let (tx, mut rx) = mpsc::channel::<Message>(8);
    registry.insert("c1".into(), context(), ConnectionHandle { tx });

    let channel = CallbackChannel::new(registry);
    channel
        .push("c1", Bytes::from_static(b"{\"note\":\"hello\"}"))
        .await
        .unwrap();

    match rx.recv().await.unwrap() {
        Message::Text(s) => assert_eq!(s, "{\"note\":\"hello\"}"),
        other => panic!("expected text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn push_to_unknown_connection_is_gone() {
    let channel = CallbackChannel::new(Arc::new(SessionRegistry::new()));
    let err = channel
        .push("never-existed", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, TollgateError::ConnectionGone(_)));
}

#[tokio::test]
async fn push_after_close_is_gone() {
    let registry = Arc::new(SessionRegistry::new());
    let (tx, _rx) = mpsc::channel::<Message>(8);
    registry.insert("c1".into(), context(), ConnectionHandle { tx });
    registry.remove("c1");

    let channel = CallbackChannel::new(registry);
    let err = channel
        .push("c1", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, TollgateError::ConnectionGone(_)));
}

#[tokio::test]
async fn non_utf8_payload_delivered_as_binary() {
    let registry = Arc::new(SessionRegistry::new());
    let (tx, mut rx) = mpsc::channel::<Message>(8);
    registry.insert("c1".into(), context(), ConnectionHandle { tx });

    let channel = CallbackChannel::new(registry);
    channel
        .push("c1", Bytes::from_static(&[0xff, 0xfe, 0x00]))
        .await
        .unwrap();

    match rx.recv().await.unwrap() {
        Message::Binary(b) => assert_eq!(b, vec![0xff, 0xfe, 0x00]),
        other => panic!("expected binary frame, got {other:?}"),
    }
}

#[test]
fn registry_remembers_connect_time_context() {
    let registry = SessionRegistry::new();
    let (tx, _rx) = mpsc::channel::<Message>(1);
    registry.insert("c1".into(), context(), ConnectionHandle { tx });

    let ctx = registry.context("c1").unwrap();
    assert_eq!(ctx.get("tenantId").map(String::as_str), Some("42"));
    assert_eq!(ctx.get("userId").map(String::as_str), Some("u1"));
    assert!(registry.context("c2").is_none());
}

#[test]
fn minted_connection_ids_are_unique() {
    let registry = SessionRegistry::new();
    let a = registry.mint_connection_id();
    let b = registry.mint_connection_id();
    assert_ne!(a, b);
}

#[test]
fn grant_is_scoped_to_issuing_api_and_stage() {
    let grant = CallbackGrant::new(
        "w1sk4tjx8j".into(),
        "production".into(),
        "arn:aws:execute-api:us-east-1:000000000000:w1sk4tjx8j/production/POST/@connections/*"
            .into(),
    );

    assert!(grant.allows("w1sk4tjx8j", "production"));
    assert!(!grant.allows("w1sk4tjx8j", "staging"));
    assert!(!grant.allows("other-api", "production"));
}

#[test]
fn grant_statements_cover_manage_and_invoke_only() {
    let arn =
        "arn:aws:execute-api:us-east-1:000000000000:w1sk4tjx8j/production/POST/@connections/*";
    let grant = CallbackGrant::new("w1sk4tjx8j".into(), "production".into(), arn.into());

    let statements = grant.statements();
    assert_eq!(statements.len(), 2);

    let actions: Vec<&str> = statements.iter().map(|s| s.action.as_str()).collect();
    assert!(actions.contains(&ACTION_MANAGE_CONNECTIONS));
    assert!(actions.contains(&ACTION_INVOKE));

    for s in &statements {
        assert_eq!(s.effect, Effect::Allow);
        // Never a wildcard across APIs.
        assert_eq!(s.resource, arn);
    }
}
