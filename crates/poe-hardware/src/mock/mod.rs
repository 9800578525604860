//! Mock GPIO platform for testing and development.
//!
//! This module provides a simulated GPIO backend plus a model of the physical
//! shift register, so the driver can be exercised without hardware.

pub mod gpio;
pub mod register;

// Re-export commonly used types
pub use gpio::{LineEvent, MockGpio, MockGpioHandle, MockOutput};
pub use register::{Frame, SimulatedRegister};
