//! Connection authorization: token verification and decision building.

pub mod authorizer;
pub mod keys;
pub mod verifier;

pub use authorizer::ConnectionAuthorizer;
pub use keys::{JwksKeyProvider, KeyProvider, StaticKeyProvider, VerificationKey};
pub use verifier::TokenVerifier;

use crate::config::IdentitySection;

/// Resolved identity-provider endpoints, injected into the verifier at
/// construction so verification is a pure function of its inputs plus this
/// config (no ambient environment reads).
#[derive(Debug, Clone)]
pub struct IdentityProvider {
    pub issuer: String,
    pub jwks_url: String,
    pub client_id: String,
}

impl IdentityProvider {
    /// Derive issuer/JWKS endpoints from the identity section.
    ///
    /// A local-development substitute serves the same token format from a
    /// different network location while the token's own issuer claim still
    /// has to match what is configured here, hence the split between the
    /// issuer string and the JWKS fetch URL.
    pub fn resolve(cfg: &IdentitySection) -> Self {
        let issuer = cfg.issuer.clone().unwrap_or_else(|| {
            if cfg.is_local() {
                format!("http://{}/{}", cfg.local_host, cfg.pool_id)
            } else {
                format!("https://{}/{}", cfg.provider_host, cfg.pool_id)
            }
        });
        let jwks_url = cfg.jwks_url.clone().unwrap_or_else(|| {
            let host = if cfg.is_local() {
                &cfg.local_host
            } else {
                &cfg.provider_host
            };
            format!("https://{}/{}/.well-known/jwks.json", host, cfg.pool_id)
        });
        Self {
            issuer,
            jwks_url,
            client_id: cfg.client_id.clone(),
        }
    }
}
