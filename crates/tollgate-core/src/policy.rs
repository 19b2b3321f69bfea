//! Authorization decisions and their wire-format policy documents.
//!
//! A decision is produced exactly once per connection attempt and is the sole
//! carrier of identity into the routing layer. Allow grants are scoped to the
//! single requested resource; denials are wildcard. The serialized shape is
//! the gateway-authorizer response contract:
//! `{principalId, policyDocument: {Version, Statement: [...]}, context?}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Policy document version accepted by the gateway collaborator.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Action granted to an authorized connection attempt.
pub const ACTION_INVOKE: &str = "execute-api:Invoke";

/// Action required to push to an open connection.
pub const ACTION_MANAGE_CONNECTIONS: &str = "execute-api:ManageConnections";

/// Context key holding the caller id.
pub const CTX_USER_ID: &str = "userId";

/// Context key holding the tenant id.
pub const CTX_TENANT_ID: &str = "tenantId";

/// Outcome of validating an identity token. Transient, computed per
/// connection attempt, never cached across connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Verified {
        /// Token subject (caller id).
        subject: String,
        /// Tenant claim, when the token carried one.
        tenant_id: Option<String>,
        /// Issuer the token was validated against.
        issuer: String,
    },
    Rejected {
        /// Internal reason. Logged, never surfaced to the caller.
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

/// Allow/Deny verdict plus context map, immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationDecision {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl AuthorizationDecision {
    pub fn effect(&self) -> Effect {
        // A decision always carries exactly one statement; an empty document
        // must never pass as an allow.
        self.policy_document
            .statement
            .first()
            .map(|s| s.effect)
            .unwrap_or(Effect::Deny)
    }

    pub fn is_allow(&self) -> bool {
        self.effect() == Effect::Allow
    }

    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.as_ref()?.get(key).map(String::as_str)
    }
}

/// Convert a verification outcome into a decision for `resource_arn`.
pub fn build(result: &VerificationResult, resource_arn: &str) -> AuthorizationDecision {
    match result {
        VerificationResult::Verified {
            subject, tenant_id, ..
        } => allow(subject, tenant_id.as_deref(), resource_arn),
        VerificationResult::Rejected { .. } => deny_all(),
    }
}

/// Allow scoped to exactly `resource_arn` (never a wildcard grant).
pub fn allow(subject: &str, tenant_id: Option<&str>, resource_arn: &str) -> AuthorizationDecision {
    let mut context = BTreeMap::new();
    context.insert(CTX_USER_ID.to_string(), subject.to_string());
    if let Some(tenant) = tenant_id {
        context.insert(CTX_TENANT_ID.to_string(), tenant.to_string());
    }

    AuthorizationDecision {
        principal_id: subject.to_string(),
        policy_document: PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                action: ACTION_INVOKE.to_string(),
                effect: Effect::Allow,
                resource: resource_arn.to_string(),
            }],
        },
        context: Some(context),
    }
}

/// Deny for all resources, anonymous principal, no context.
pub fn deny_all() -> AuthorizationDecision {
    AuthorizationDecision {
        principal_id: "*".to_string(),
        policy_document: PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                action: "*".to_string(),
                effect: Effect::Deny,
                resource: "*".to_string(),
            }],
        },
        context: None,
    }
}
