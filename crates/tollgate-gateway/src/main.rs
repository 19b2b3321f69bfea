//! Tollgate gateway binary.
//!
//! - WebSocket endpoint: /v1/ws?Authorization=...
//! - Callback endpoint: POST /{stage}/@connections/{connection_id}
//! - Ops endpoints: /healthz, /readyz, /metrics

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use tollgate_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tollgate.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .expect("gateway.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "tollgate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            state.metrics().set_draining();
            tracing::info!("shutdown signal received, draining");
        })
        .await
        .expect("server failed");
}
