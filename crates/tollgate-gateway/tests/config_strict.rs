#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tollgate_gateway::config;

const MINIMAL: &str = r#"
version: 1
identity:
  pool_id: "us-east-1_abc123"
  client_id: "app-x"
backend:
  endpoint: "http://backend.internal:8080/ws-events"
api:
  api_id: "w1sk4tjx8j"
  domain_name: "ws.example.com"
"#;

#[test]
fn ok_minimal_config_with_defaults() {
    let cfg = config::load_from_str(MINIMAL).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.identity.environment, "production");
    assert!(!cfg.identity.is_local());
    assert_eq!(cfg.backend.routes, vec!["message".to_string()]);
    assert_eq!(cfg.api.stage, "production");
}

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
identity:
  pool_id: "us-east-1_abc123"
  client_idz: "app-x" # typo should fail
backend:
  endpoint: "http://backend.internal:8080/ws-events"
api:
  api_id: "w1sk4tjx8j"
  domain_name: "ws.example.com"
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn unsupported_version_rejected() {
    let bad = MINIMAL.replace("version: 1", "version: 2");
    assert!(config::load_from_str(&bad).is_err());
}

#[test]
fn idle_timeout_must_exceed_ping_interval() {
    let bad = format!(
        "{MINIMAL}gateway:\n  ping_interval_ms: 20000\n  idle_timeout_ms: 15000\n"
    );
    assert!(config::load_from_str(&bad).is_err());
}

#[test]
fn empty_client_id_rejected() {
    let bad = MINIMAL.replace("client_id: \"app-x\"", "client_id: \"\"");
    assert!(config::load_from_str(&bad).is_err());
}

#[test]
fn connect_and_connections_arns() {
    let cfg = config::load_from_str(MINIMAL).unwrap();
    assert_eq!(
        cfg.api.connect_arn(),
        "arn:aws:execute-api:us-east-1:000000000000:w1sk4tjx8j/production/$connect"
    );
    assert_eq!(
        cfg.api.connections_arn(),
        "arn:aws:execute-api:us-east-1:000000000000:w1sk4tjx8j/production/POST/@connections/*"
    );
}

#[test]
fn local_environment_parses() {
    let local = MINIMAL.replace(
        "client_id: \"app-x\"",
        "client_id: \"app-x\"\n  environment: \"local\"",
    );
    let cfg = config::load_from_str(&local).unwrap();
    assert!(cfg.identity.is_local());
}
