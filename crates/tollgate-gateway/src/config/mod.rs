//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use tollgate_core::error::{Result, TollgateError};

pub use schema::{
    ApiSection, BackendSection, GatewayConfig, GatewaySection, IdentitySection,
};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TollgateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| TollgateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
