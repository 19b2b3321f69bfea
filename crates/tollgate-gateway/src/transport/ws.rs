//! WebSocket handler.
//!
//! Responsibilities:
//! - Authorize the connection attempt before upgrade (bearer token from the
//!   `Authorization` query parameter)
//! - Dispatch the connect call before the socket counts as established
//! - Lifecycle: ping/pong + idle timeout
//! - Route inbound text frames to the backend by their `action` field
//! - Dispatch the disconnect call best-effort on the way out
//!
//! A denied attempt is closed with a generic refusal; no application-level
//! detail reaches the client.

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::Instrument;

use tollgate_core::connection::{ConnectionMetadata, ConnectionState};
use tollgate_core::error::{Result, TollgateError};
use tollgate_core::policy::AuthorizationDecision;

use crate::app_state::AppState;
use crate::session::ConnectionHandle;

// --------------------
// Query parsing
// --------------------
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Bearer token presented as a query parameter on connection.
    #[serde(rename = "Authorization")]
    pub authorization: Option<String>,
}

// --------------------
// Safe JSON builders
// --------------------
fn gate_error_json(code: &str, message: &str) -> String {
    json!({
        "code": code,
        "message": message,
    })
    .to_string()
}

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(
    State(app): State<AppState>,
    ws: WebSocketUpgrade,
    Query(q): Query<WsQuery>,
) -> Response {
    let resource_arn = app.connect_arn();
    let decision = app
        .authorizer()
        .authorize(q.authorization.as_deref(), &resource_arn)
        .await;

    let effect = if decision.is_allow() { "allow" } else { "deny" };
    app.metrics().auth_decisions.inc(&[("effect", effect)]);

    if !decision.is_allow() {
        // Generic connection-refused outcome, nothing more.
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let meta = ConnectionMetadata {
        connection_id: app.registry().mint_connection_id(),
        domain_name: app.cfg().api.domain_name.clone(),
        stage: app.cfg().api.stage.clone(),
    };
    let conn_state = ConnectionState::Pending;

    // Connect must reach the backend before the socket is established.
    if let Err(e) = app.dispatcher().dispatch_connect(&decision, &meta).await {
        app.metrics()
            .dispatch_failures
            .inc(&[("event", "connect")]);
        tracing::warn!(connection_id = %meta.connection_id, error = %e, "connect routing failed");
        return StatusCode::BAD_GATEWAY.into_response();
    }
    app.metrics()
        .route_dispatches
        .inc(&[("event", "connect")]);

    let conn_state = match conn_state.connect() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "connection state corrupted before upgrade");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let span = tracing::info_span!("session", connection_id = %meta.connection_id);
    ws.on_upgrade(move |socket| {
        async move {
            if let Err(e) = run_session(app, decision, meta, conn_state, socket).await {
                tracing::debug!(error = %e, "session ended with error");
            }
        }
        .instrument(span)
    })
}

// --------------------
// Core session loop
// --------------------
async fn run_session(
    app: AppState,
    decision: AuthorizationDecision,
    meta: ConnectionMetadata,
    conn_state: ConnectionState,
    socket: WebSocket,
) -> Result<()> {
    // ---- outbound channel
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(1024);

    // ---- register: the gateway remembers the connect-time context for the
    // lifetime of the socket.
    let context = decision.context.clone().unwrap_or_default();
    app.registry().insert(
        meta.connection_id.clone(),
        context,
        ConnectionHandle { tx: out_tx.clone() },
    );
    app.metrics().connections_active.inc(&[]);

    // ---- split socket
    let (mut ws_tx, mut ws_rx) = socket.split();

    // ---- timers
    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };

                last_activity = Instant::now();

                match msg {
                    Message::Text(s) => {
                        match app.dispatcher().dispatch_message(&meta, &s).await {
                            Ok(()) => {
                                app.metrics().route_dispatches.inc(&[("event", "message")]);
                            }
                            Err(e) => {
                                app.metrics().dispatch_failures.inc(&[("event", "message")]);
                                let code = e.client_code();
                                let msg = match &e {
                                    TollgateError::UnknownRoute(_) => "unknown action",
                                    TollgateError::BadRequest(_) => "invalid frame",
                                    _ => "message not delivered",
                                };
                                let _ = out_tx
                                    .send(Message::Text(gate_error_json(code.as_str(), msg)))
                                    .await;
                            }
                        }
                    }

                    Message::Binary(_) => {
                        // Frames are JSON text; binary has no route.
                        let _ = out_tx
                            .send(Message::Text(gate_error_json("BAD_REQUEST", "binary frames not supported")))
                            .await;
                    }

                    Message::Ping(payload) => {
                        let _ = out_tx.send(Message::Pong(payload)).await;
                    }
                    Message::Pong(_) => {}
                    Message::Close(_) => break,
                }
            }

            // ping
            _ = ping_tick.tick() => {
                let _ = out_tx.send(Message::Ping(Vec::new())).await;
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    break;
                }
            }
        }
    }

    // ---- teardown: Closed is terminal; disconnect routing is best effort.
    app.registry().remove(&meta.connection_id);
    app.metrics().connections_active.dec(&[]);
    if let Err(e) = conn_state.close() {
        tracing::error!(error = %e, "connection state corrupted at teardown");
    }
    app.dispatcher().dispatch_disconnect(&meta).await;
    app.metrics()
        .route_dispatches
        .inc(&[("event", "disconnect")]);

    Ok(())
}
