//! GPIO capability traits.
//!
//! The driver never talks to a GPIO controller directly. It is handed a
//! [`GpioPlatform`] at construction, acquires its four lines from it, and from
//! then on only ever calls [`DigitalOutput::set_level`]. This keeps the
//! bit-banging logic testable against the mock platform and lets the same
//! driver run on any backend that can drive an output line.
//!
//! Both traits are synchronous. A level change is a single register or file
//! write, and the shift-out loop must run to completion without yielding.

use crate::error::Result;
use crate::types::{Level, LineSpec};

/// A write-only digital output line.
///
/// There is no read-back: implementations report nothing to the caller if a
/// write fails and are expected to log instead.
pub trait DigitalOutput: Send {
    /// Drive the line to `level`.
    fn set_level(&mut self, level: Level);

    fn set_high(&mut self) {
        self.set_level(Level::High);
    }

    fn set_low(&mut self) {
        self.set_level(Level::Low);
    }

    /// Drive the line high, then low.
    fn pulse(&mut self) {
        self.set_high();
        self.set_low();
    }
}

/// Source of exclusively-owned output lines.
///
/// # Examples
///
/// ```
/// use poe_hardware::mock::MockGpio;
/// use poe_hardware::traits::{DigitalOutput, GpioPlatform};
/// use poe_hardware::types::{Level, LineRole, LineSpec};
///
/// let (mut gpio, handle) = MockGpio::new();
/// let spec = LineSpec::new(LineRole::OutputEnable, 7);
///
/// let mut line = gpio.acquire(&spec).unwrap();
/// line.set_level(Level::High);
/// assert_eq!(handle.level(7), Some(Level::High));
///
/// gpio.release(&spec);
/// assert!(handle.held_lines().is_empty());
/// ```
pub trait GpioPlatform: Send + 'static {
    /// Output handle produced by [`acquire`](Self::acquire).
    type Output: DigitalOutput + 'static;

    /// Request exclusive ownership of a line and configure it as an output.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::ResourceUnavailable`](crate::HardwareError::ResourceUnavailable)
    /// if the line is missing or already owned.
    fn acquire(&mut self, spec: &LineSpec) -> Result<Self::Output>;

    /// Give up ownership of a line.
    ///
    /// Releasing a line that is not held is a no-op.
    fn release(&mut self, spec: &LineSpec);
}
