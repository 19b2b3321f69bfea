//! Shared application state for the Tollgate gateway.

use std::sync::Arc;

use crate::auth::{ConnectionAuthorizer, IdentityProvider, JwksKeyProvider, KeyProvider, TokenVerifier};
use crate::callback::{CallbackChannel, CallbackGrant};
use crate::config::GatewayConfig;
use crate::dispatch::{HttpRouteTarget, RouteDispatcher, RouteTarget};
use crate::obs::GatewayMetrics;
use crate::session::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    authorizer: ConnectionAuthorizer,
    dispatcher: RouteDispatcher,
    registry: Arc<SessionRegistry>,
    callback: CallbackChannel,
    grant: CallbackGrant,
    metrics: GatewayMetrics,
}

impl AppState {
    /// Build application state with the production key provider and backend
    /// target derived from config.
    pub fn new(cfg: GatewayConfig) -> Self {
        let provider = IdentityProvider::resolve(&cfg.identity);
        let keys: Arc<dyn KeyProvider> = Arc::new(JwksKeyProvider::new(provider.jwks_url.clone()));
        let target: Arc<dyn RouteTarget> =
            Arc::new(HttpRouteTarget::new(cfg.backend.endpoint.clone()));
        Self::with_components(cfg, keys, target)
    }

    /// Build application state around injected collaborators. Tests use
    /// this to pin verification keys and capture backend calls.
    pub fn with_components(
        cfg: GatewayConfig,
        keys: Arc<dyn KeyProvider>,
        target: Arc<dyn RouteTarget>,
    ) -> Self {
        let provider = IdentityProvider::resolve(&cfg.identity);
        let verifier = TokenVerifier::new(provider, keys);
        let authorizer = ConnectionAuthorizer::new(verifier);

        let dispatcher = RouteDispatcher::new(target);
        for route in &cfg.backend.routes {
            dispatcher.register_route(route.clone());
        }

        let registry = Arc::new(SessionRegistry::new());
        let callback = CallbackChannel::new(Arc::clone(&registry));
        let grant = CallbackGrant::new(
            cfg.api.api_id.clone(),
            cfg.api.stage.clone(),
            cfg.api.connections_arn(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                authorizer,
                dispatcher,
                registry,
                callback,
                grant,
                metrics: GatewayMetrics::default(),
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn authorizer(&self) -> &ConnectionAuthorizer {
        &self.inner.authorizer
    }

    pub fn dispatcher(&self) -> &RouteDispatcher {
        &self.inner.dispatcher
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.inner.registry
    }

    pub fn callback(&self) -> &CallbackChannel {
        &self.inner.callback
    }

    pub fn grant(&self) -> &CallbackGrant {
        &self.inner.grant
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    /// Resource ARN a connect attempt is authorized against.
    pub fn connect_arn(&self) -> String {
        self.inner.cfg.api.connect_arn()
    }
}
