//! Identity token verification.
//!
//! Fails closed: malformed token, signature mismatch, issuer mismatch,
//! expiry, and client-id mismatch all collapse to `Rejected`, never a
//! partial success. The audience is not checked via the generic `aud`
//! mechanism; a provider-specific check accepts the `client_id` claim (or
//! `aud` fallback, which some providers use for id tokens instead) and
//! gates the token's `token_use` purpose. No retries: a failed verification
//! is a rejection, full stop.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, Validation};
use serde::Deserialize;

use tollgate_core::error::{Result, TollgateError};
use tollgate_core::policy::VerificationResult;

use super::keys::KeyProvider;
use super::IdentityProvider;

/// Claims read out of a verified token.
#[derive(Debug, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub iss: String,
    #[serde(default)]
    pub token_use: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
    /// Tenant claim as flattened at token generation.
    #[serde(default)]
    pub tenantid: Option<String>,
    /// Tenant claim under the raw custom attribute name.
    #[serde(default, rename = "custom:tenantid")]
    pub custom_tenantid: Option<String>,
}

impl IdentityClaims {
    fn tenant_id(&self) -> Option<&str> {
        self.tenantid
            .as_deref()
            .or(self.custom_tenantid.as_deref())
    }
}

/// Provider-specific claim checks, applied after signature/issuer/expiry.
fn check_provider_claims(claims: &IdentityClaims, client_id: &str) -> Result<()> {
    let effective_client = claims.client_id.as_deref().or(claims.aud.as_deref());
    if effective_client != Some(client_id) {
        return Err(TollgateError::AuthFailed);
    }
    if let Some(token_use) = claims.token_use.as_deref() {
        if token_use != "id" && token_use != "access" {
            return Err(TollgateError::AuthFailed);
        }
    }
    Ok(())
}

/// Validates signature, issuer, expiry, and provider-specific claims
/// against the configured identity provider.
pub struct TokenVerifier {
    provider: IdentityProvider,
    keys: Arc<dyn KeyProvider>,
}

impl TokenVerifier {
    pub fn new(provider: IdentityProvider, keys: Arc<dyn KeyProvider>) -> Self {
        Self { provider, keys }
    }

    pub fn issuer(&self) -> &str {
        &self.provider.issuer
    }

    /// Verify a raw bearer token. Never panics and never partially
    /// succeeds; every failure path lands in `Rejected`.
    pub async fn verify(&self, raw_token: &str) -> VerificationResult {
        match self.verify_inner(raw_token).await {
            Ok(claims) => VerificationResult::Verified {
                subject: claims.sub.clone(),
                tenant_id: claims.tenant_id().map(str::to_string),
                issuer: claims.iss,
            },
            Err(e) => VerificationResult::Rejected {
                reason: e.to_string(),
            },
        }
    }

    async fn verify_inner(&self, raw_token: &str) -> Result<IdentityClaims> {
        let header = decode_header(raw_token)
            .map_err(|e| TollgateError::BadRequest(format!("malformed token: {e}")))?;

        let key = self.keys.decoding_key(header.kid.as_deref()).await?;

        let mut validation = Validation::new(key.alg);
        validation.set_issuer(&[&self.provider.issuer]);
        // Audience is validated through the client-id check below instead.
        validation.validate_aud = false;

        let data = decode::<IdentityClaims>(raw_token, &key.key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "token validation failed");
            TollgateError::AuthFailed
        })?;

        check_provider_claims(&data.claims, &self.provider.client_id)?;
        Ok(data.claims)
    }
}
