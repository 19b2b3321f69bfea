//! Backend callback endpoint: `POST /{stage}/@connections/{connection_id}`.
//!
//! The reverse path for backend-initiated pushes. Scope is enforced against
//! the gateway's grant before any delivery: pushes against another stage
//! (or another API's grant) are refused outright.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use tollgate_core::error::TollgateError;

use crate::app_state::AppState;

pub async fn callback_push(
    State(app): State<AppState>,
    Path((stage, connection_id)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    if !app.grant().allows(&app.cfg().api.api_id, &stage) {
        app.metrics()
            .callback_pushes
            .inc(&[("outcome", "forbidden")]);
        return StatusCode::FORBIDDEN.into_response();
    }

    match app.callback().push(&connection_id, body).await {
        Ok(()) => {
            app.metrics().callback_pushes.inc(&[("outcome", "ok")]);
            StatusCode::OK.into_response()
        }
        // Expected race: the peer disconnected between message production
        // and delivery.
        Err(TollgateError::ConnectionGone(_)) => {
            app.metrics().callback_pushes.inc(&[("outcome", "gone")]);
            StatusCode::GONE.into_response()
        }
        Err(e) => {
            app.metrics().callback_pushes.inc(&[("outcome", "error")]);
            tracing::warn!(%connection_id, error = %e, "callback push failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
