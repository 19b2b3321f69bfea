//! Axum router wiring.
//!
//! `/v1/ws` upgrades WebSocket connections; the callback route mirrors the
//! management-endpoint shape `POST /{stage}/@connections/{connection_id}`.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ws", get(transport::ws::ws_upgrade))
        .route(
            "/:stage/@connections/:connection_id",
            post(transport::callback::callback_push),
        )
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
