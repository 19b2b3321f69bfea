//! The single authorization entry point for inbound connection attempts.

use tollgate_core::policy::{self, AuthorizationDecision, VerificationResult};

use super::verifier::TokenVerifier;

/// Orchestrates verify -> build for each connection attempt.
///
/// Infallible by contract: a missing token short-circuits to the deny path
/// without touching the verifier, and every failure inside the verify path
/// is converted into the same wildcard deny. Callers can never distinguish
/// an internal error from a deliberate denial. Side-effect free and
/// idempotent (modulo token expiry).
pub struct ConnectionAuthorizer {
    verifier: TokenVerifier,
}

impl ConnectionAuthorizer {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub async fn authorize(
        &self,
        raw_token: Option<&str>,
        resource_arn: &str,
    ) -> AuthorizationDecision {
        let Some(raw_token) = raw_token else {
            tracing::info!("no token on connection attempt");
            return policy::deny_all();
        };

        let result = self.verifier.verify(raw_token).await;
        if let VerificationResult::Rejected { reason } = &result {
            tracing::info!(%reason, "connection attempt denied");
        }
        policy::build(&result, resource_arn)
    }
}
