//! Shift register driver for the PoE switch power controller.
//!
//! The power stage of the switch is controlled by a 16-bit serial-in,
//! parallel-out register wired to four GPIO lines (clock, data, store,
//! output-enable). Each port owns two register bits, one enabling 24V and one
//! enabling 48V. This crate bit-bangs that register and layers the port
//! semantics on top.
//!
//! # Layers
//!
//! - [`traits`]: the GPIO capability the driver consumes ([`GpioPlatform`],
//!   [`DigitalOutput`]).
//! - [`driver`]: [`ShiftRegisterDriver`] owns the lines and the register
//!   mirror and implements the shift-out protocol.
//! - [`port`] / [`output_enable`]: per-port voltage control with the
//!   power-on settling delay, and the global output gate.
//! - [`switch`]: [`PoeSwitch`] puts the driver behind one lock and sequences
//!   start-up and teardown.
//!
//! # Platforms
//!
//! - [`mock::MockGpio`] records every line change and can replay them through
//!   a simulated register. Used by all tests.
//! - [`sysfs::SysfsGpio`] drives real lines through `/sys/class/gpio`
//!   (feature `sysfs`, Unix only).
//!
//! # Error Handling
//!
//! Start-up can fail with
//! [`ResourceUnavailable`](HardwareError::ResourceUnavailable) and requests
//! with bad arguments fail with
//! [`InvalidArgument`](HardwareError::InvalidArgument). Register writes never
//! fail: the hardware has no way to report a bad write.

pub mod config;
pub mod driver;
pub mod error;
pub mod mock;
pub mod output_enable;
pub mod port;
pub mod switch;
#[cfg(all(feature = "sysfs", unix))]
pub mod sysfs;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{HardwareConfig, LineConfig};
pub use driver::ShiftRegisterDriver;
pub use error::{HardwareError, Result};
pub use output_enable::OutputEnableController;
pub use port::{PortController, requires_settling};
pub use switch::{PoeSwitch, SwitchStatus};
#[cfg(all(feature = "sysfs", unix))]
pub use sysfs::SysfsGpio;
pub use traits::{DigitalOutput, GpioPlatform};
pub use types::{Level, LineRole, LineSpec};
