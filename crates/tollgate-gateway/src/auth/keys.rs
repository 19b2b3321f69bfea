//! Verification key providers.
//!
//! The verifier asks a `KeyProvider` for the decoding key matching a token's
//! `kid`. The production provider fetches the provider's JWKS document over
//! HTTP and caches it with a rotation-aware TTL; an unknown `kid` triggers
//! one refresh before failing. Retry policy beyond that single refresh
//! belongs to callers' key-rotation schedules, not this subsystem.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use tokio::sync::Mutex;

use tollgate_core::error::{Result, TollgateError};

/// A decoding key plus the metadata needed to select and use it.
#[derive(Clone)]
pub struct VerificationKey {
    pub kid: Option<String>,
    pub alg: Algorithm,
    pub key: DecodingKey,
}

#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Return the key for `kid`, or any available key when the token header
    /// carries none.
    async fn decoding_key(&self, kid: Option<&str>) -> Result<VerificationKey>;
}

/// JWKS document as served at `/.well-known/jwks.json`.
#[derive(Debug, Clone, Deserialize)]
struct JwksDocument {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kty: String,
    #[serde(default)]
    kid: Option<String>,
    #[serde(default)]
    alg: Option<String>,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

fn alg_from_str(alg: Option<&str>) -> Algorithm {
    match alg {
        Some("RS384") => Algorithm::RS384,
        Some("RS512") => Algorithm::RS512,
        _ => Algorithm::RS256,
    }
}

/// Fetches and caches the identity provider's key set.
pub struct JwksKeyProvider {
    jwks_url: String,
    client: reqwest::Client,
    keys: DashMap<String, VerificationKey>,
    refresh: Mutex<Option<Instant>>,
    ttl: Duration,
}

impl JwksKeyProvider {
    pub fn new(jwks_url: String) -> Self {
        Self {
            jwks_url,
            client: reqwest::Client::new(),
            keys: DashMap::new(),
            refresh: Mutex::new(None),
            ttl: Duration::from_secs(3600),
        }
    }

    fn cached(&self, kid: Option<&str>) -> Option<VerificationKey> {
        match kid {
            Some(kid) => self.keys.get(kid).map(|k| k.value().clone()),
            None => self.keys.iter().next().map(|k| k.value().clone()),
        }
    }

    async fn refresh_keys(&self) -> Result<()> {
        let doc: JwksDocument = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| TollgateError::Internal(format!("fetch jwks failed: {e}")))?
            .json()
            .await
            .map_err(|e| TollgateError::Internal(format!("decode jwks failed: {e}")))?;

        self.keys.clear();
        for jwk in doc.keys {
            if jwk.kty != "RSA" {
                continue;
            }
            let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
                continue;
            };
            let Ok(key) = DecodingKey::from_rsa_components(n, e) else {
                tracing::warn!(kid = ?jwk.kid, "skipping unparseable jwk");
                continue;
            };
            let entry = VerificationKey {
                kid: jwk.kid.clone(),
                alg: alg_from_str(jwk.alg.as_deref()),
                key,
            };
            let cache_key = jwk.kid.unwrap_or_default();
            self.keys.insert(cache_key, entry);
        }

        tracing::debug!(url = %self.jwks_url, keys = self.keys.len(), "jwks refreshed");
        Ok(())
    }

    async fn ensure_fresh(&self, force: bool) -> Result<()> {
        let mut last = self.refresh.lock().await;
        let stale = match *last {
            Some(at) => at.elapsed() >= self.ttl,
            None => true,
        };
        if force || stale {
            self.refresh_keys().await?;
            *last = Some(Instant::now());
        }
        Ok(())
    }
}

#[async_trait]
impl KeyProvider for JwksKeyProvider {
    async fn decoding_key(&self, kid: Option<&str>) -> Result<VerificationKey> {
        self.ensure_fresh(false).await?;
        if let Some(key) = self.cached(kid) {
            return Ok(key);
        }

        // Unknown kid: the pool may have rotated; refresh once.
        self.ensure_fresh(true).await?;
        self.cached(kid).ok_or(TollgateError::AuthFailed)
    }
}

/// In-memory provider for tests and pinned-key deployments.
pub struct StaticKeyProvider {
    keys: Vec<VerificationKey>,
}

impl StaticKeyProvider {
    pub fn new(keys: Vec<VerificationKey>) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn decoding_key(&self, kid: Option<&str>) -> Result<VerificationKey> {
        let found = match kid {
            Some(kid) => self
                .keys
                .iter()
                .find(|k| k.kid.as_deref() == Some(kid)),
            None => self.keys.first(),
        };
        found.cloned().ok_or(TollgateError::AuthFailed)
    }
}

