//! Authorization decision vector tests: shape and wire format.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use tollgate_core::policy::{
    self, AuthorizationDecision, Effect, VerificationResult, CTX_TENANT_ID, CTX_USER_ID,
};

const ARN: &str = "arn:aws:execute-api:us-east-1:000000000000:w1sk4tjx8j/production/$connect";

#[test]
fn allow_is_scoped_to_requested_resource() {
    let d = policy::allow("u1", Some("42"), ARN);
    assert!(d.is_allow());
    assert_eq!(d.principal_id, "u1");
    assert_eq!(d.policy_document.statement.len(), 1);
    assert_eq!(d.policy_document.statement[0].resource, ARN);
    assert_eq!(d.policy_document.statement[0].action, "execute-api:Invoke");
    assert_eq!(d.context_value(CTX_USER_ID), Some("u1"));
    assert_eq!(d.context_value(CTX_TENANT_ID), Some("42"));
}

#[test]
fn allow_without_tenant_claim_still_carries_user() {
    let d = policy::allow("u1", None, ARN);
    assert!(d.is_allow());
    assert_eq!(d.context_value(CTX_USER_ID), Some("u1"));
    assert_eq!(d.context_value(CTX_TENANT_ID), None);
}

#[test]
fn deny_is_wildcard_and_contextless() {
    let d = policy::deny_all();
    assert!(!d.is_allow());
    assert_eq!(d.principal_id, "*");
    assert_eq!(d.policy_document.statement[0].resource, "*");
    assert_eq!(d.policy_document.statement[0].action, "*");
    assert_eq!(d.policy_document.statement[0].effect, Effect::Deny);
    assert!(d.context.is_none());
}

#[test]
fn build_maps_verified_and_rejected() {
    let verified = VerificationResult::Verified {
        subject: "u1".into(),
        tenant_id: Some("42".into()),
        issuer: "https://idp.example/pool".into(),
    };
    assert!(policy::build(&verified, ARN).is_allow());

    let rejected = VerificationResult::Rejected {
        reason: "signature mismatch".into(),
    };
    let d = policy::build(&rejected, ARN);
    assert!(!d.is_allow());
    assert_eq!(d.policy_document.statement[0].resource, "*");
}

#[test]
fn allow_wire_format() {
    let d = policy::allow("u1", Some("42"), ARN);
    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(
        v,
        json!({
            "principalId": "u1",
            "policyDocument": {
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Action": "execute-api:Invoke",
                        "Effect": "Allow",
                        "Resource": ARN,
                    }
                ]
            },
            "context": {
                "tenantId": "42",
                "userId": "u1",
            }
        })
    );
}

#[test]
fn deny_wire_format_omits_context() {
    let v = serde_json::to_value(policy::deny_all()).unwrap();
    assert_eq!(
        v,
        json!({
            "principalId": "*",
            "policyDocument": {
                "Version": "2012-10-17",
                "Statement": [
                    { "Action": "*", "Effect": "Deny", "Resource": "*" }
                ]
            }
        })
    );
}

#[test]
fn decision_round_trips_through_json() {
    let d = policy::allow("u1", Some("42"), ARN);
    let s = serde_json::to_string(&d).unwrap();
    let back: AuthorizationDecision = serde_json::from_str(&s).unwrap();
    assert_eq!(back, d);
}

#[test]
fn empty_document_never_reads_as_allow() {
    let d = AuthorizationDecision {
        principal_id: "u1".into(),
        policy_document: tollgate_core::policy::PolicyDocument {
            version: "2012-10-17".into(),
            statement: vec![],
        },
        context: None,
    };
    assert!(!d.is_allow());
}
