//! Top-level facade crate for Tollgate.
//!
//! Re-exports core types and the gateway library so users can depend on a
//! single crate.

pub mod core {
    pub use tollgate_core::*;
}

pub mod gateway {
    pub use tollgate_gateway::*;
}
