//! Wire-level contracts for inbound client frames.

pub mod frame;

pub use frame::Frame;
