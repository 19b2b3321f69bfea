//! Inbound message frame (JSON).
//!
//! Only the `action` routing field is read by the gateway; the rest of the
//! frame is forwarded to the backend verbatim, so unknown fields are
//! tolerated here. `action` selects a server-side route and is never an
//! authorization signal.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{Result, TollgateError};

/// Client message frame. `data` stays raw for pass-through.
#[derive(Debug, Deserialize)]
pub struct Frame {
    /// Client-chosen routing key.
    pub action: String,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

/// Parse a text frame far enough to route it.
pub fn parse_frame(raw: &str) -> Result<Frame> {
    serde_json::from_str(raw)
        .map_err(|e| TollgateError::BadRequest(format!("invalid frame json: {e}")))
}
