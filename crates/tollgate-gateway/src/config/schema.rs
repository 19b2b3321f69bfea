use serde::Deserialize;
use tollgate_core::error::{Result, TollgateError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub identity: IdentitySection,

    pub backend: BackendSection,

    pub api: ApiSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TollgateError::BadRequest(
                "version must be 1".into(),
            ));
        }

        self.gateway.validate()?;
        self.identity.validate()?;
        self.backend.validate()?;
        self.api.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(TollgateError::BadRequest(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(TollgateError::BadRequest(
                "gateway.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(TollgateError::BadRequest(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}

/// Identity-provider settings. Issuer and JWKS endpoints are derived from
/// these at construction time; explicit `issuer`/`jwks_url` overrides win so
/// the verifier never infers its provider from ambient state.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    /// Identity-provider user pool id.
    pub pool_id: String,
    /// Application client id the token must have been issued to.
    pub client_id: String,
    /// Deployment environment tag. `"local"` selects the local-network
    /// issuer/JWKS override; anything else selects the production provider.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Production provider host.
    #[serde(default = "default_provider_host")]
    pub provider_host: String,
    /// Local-development provider host (used when environment is `"local"`).
    #[serde(default = "default_local_host")]
    pub local_host: String,
    /// Explicit issuer override.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Explicit JWKS endpoint override.
    #[serde(default)]
    pub jwks_url: Option<String>,
}

impl IdentitySection {
    pub fn validate(&self) -> Result<()> {
        if self.pool_id.trim().is_empty() {
            return Err(TollgateError::BadRequest(
                "identity.pool_id must not be empty".into(),
            ));
        }
        if self.client_id.trim().is_empty() {
            return Err(TollgateError::BadRequest(
                "identity.client_id must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn is_local(&self) -> bool {
        self.environment == "local"
    }
}

fn default_environment() -> String {
    "production".into()
}
fn default_provider_host() -> String {
    "cognito-idp.us-east-1.amazonaws.com".into()
}
fn default_local_host() -> String {
    "localhost.localstack.cloud:4566".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendSection {
    /// Backend integration endpoint. All three lifecycle calls target this
    /// URL; the HTTP method distinguishes the event.
    pub endpoint: String,

    /// Registered message routes (frame `action` values that dispatch).
    #[serde(default = "default_routes")]
    pub routes: Vec<String>,
}

impl BackendSection {
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(TollgateError::BadRequest(
                "backend.endpoint must not be empty".into(),
            ));
        }
        if self.routes.is_empty() {
            return Err(TollgateError::BadRequest(
                "backend.routes must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_routes() -> Vec<String> {
    vec!["message".into()]
}

/// Gateway-scoped facts: the API identity used for resource ARNs, the stage,
/// and the public domain reported to the backend in routing headers.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    pub api_id: String,
    #[serde(default = "default_stage")]
    pub stage: String,
    pub domain_name: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_account_id")]
    pub account_id: String,
}

impl ApiSection {
    pub fn validate(&self) -> Result<()> {
        if self.api_id.trim().is_empty() {
            return Err(TollgateError::BadRequest(
                "api.api_id must not be empty".into(),
            ));
        }
        if self.domain_name.trim().is_empty() {
            return Err(TollgateError::BadRequest(
                "api.domain_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Method ARN for the connect route, the resource an allow is scoped to.
    pub fn connect_arn(&self) -> String {
        format!(
            "arn:aws:execute-api:{}:{}:{}/{}/$connect",
            self.region, self.account_id, self.api_id, self.stage
        )
    }

    /// ARN covering callback pushes to connections of this API and stage.
    pub fn connections_arn(&self) -> String {
        format!(
            "arn:aws:execute-api:{}:{}:{}/{}/POST/@connections/*",
            self.region, self.account_id, self.api_id, self.stage
        )
    }
}

fn default_stage() -> String {
    "production".into()
}
fn default_region() -> String {
    "us-east-1".into()
}
fn default_account_id() -> String {
    "000000000000".into()
}
