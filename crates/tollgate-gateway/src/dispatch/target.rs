//! Backend seam.
//!
//! The dispatcher talks to the backend through `RouteTarget` so tests can
//! capture routed requests and deployments can swap the transport
//! indirection (direct integration vs. load-balancer hop) without touching
//! routing semantics.

use async_trait::async_trait;
use reqwest::Method;

use tollgate_core::error::{Result, TollgateError};
use tollgate_core::route::{LifecycleEvent, RoutedRequest};

#[async_trait]
pub trait RouteTarget: Send + Sync {
    async fn call(&self, req: RoutedRequest) -> Result<()>;
}

/// HTTP route target: one backend endpoint, method selects the event.
pub struct HttpRouteTarget {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRouteTarget {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

fn method_of(event: LifecycleEvent) -> Method {
    match event {
        LifecycleEvent::Connect => Method::PUT,
        LifecycleEvent::Message => Method::POST,
        LifecycleEvent::Disconnect => Method::DELETE,
    }
}

#[async_trait]
impl RouteTarget for HttpRouteTarget {
    async fn call(&self, req: RoutedRequest) -> Result<()> {
        let mut builder = self.client.request(method_of(req.event), &self.endpoint);
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TollgateError::Backend(format!("backend unreachable: {e}")))?;

        if !resp.status().is_success() {
            return Err(TollgateError::Backend(format!(
                "backend returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
