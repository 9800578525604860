//! Core types for the PoE power-control register.
//!
//! The register is a 16-bit serial-in, parallel-out shift register carrying two
//! enable bits per switch port. This crate holds the pure data model shared by
//! the hardware driver and the control surface: port indices, voltage classes,
//! and the register value with its per-port encode/decode rules.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
