//! Bit-banged shift register driver.
//!
//! The driver owns the four interface lines and the in-memory mirror of the
//! register. The hardware has no read-back path, so the mirror is the only
//! record of what the ports are doing; it is reset to all-off and pushed out
//! at initialization because the physical register keeps whatever it last
//! latched, possibly from a previous session.
//!
//! # Shift-out protocol
//!
//! ```text
//!  store  ____________________________________________/‾\_
//!  clock  ___/‾\___/‾\___/‾\ ... ___/‾\___/‾\____________
//!  data   <b15 ><b14 ><b13 > ...  <b1  ><b0  >
//! ```
//!
//! Bit 15 goes first so that the last bit shifted (bit 0) ends up on the
//! lowest output.

use crate::config::LineConfig;
use crate::error::Result;
use crate::traits::{DigitalOutput, GpioPlatform};
use crate::types::{Level, LineSpec};
use poe_core::RegisterState;
use poe_core::constants::REGISTER_WIDTH;
use tracing::{debug, info, trace, warn};

struct ShiftLines<O> {
    output_enable: O,
    clock: O,
    data: O,
    store: O,
}

impl<O: DigitalOutput> ShiftLines<O> {
    fn shift_out(&mut self, value: u16) {
        self.store.set_low();
        self.clock.set_low();

        for i in (0..REGISTER_WIDTH).rev() {
            self.data.set_level(Level::from((value >> i) & 1 == 1));
            self.clock.pulse();
        }

        self.store.pulse();
    }
}

/// Owner of the register mirror and the shift register lines.
///
/// # Examples
///
/// ```
/// use poe_hardware::config::LineConfig;
/// use poe_hardware::driver::ShiftRegisterDriver;
/// use poe_hardware::mock::MockGpio;
///
/// let (gpio, handle) = MockGpio::new();
/// let mut driver = ShiftRegisterDriver::initialize(gpio, &LineConfig::default()).unwrap();
///
/// driver.write(0x8001);
/// assert_eq!(driver.register().bits(), 0x8001);
/// assert_eq!(handle.register().outputs(), Some(0x8001));
///
/// driver.teardown();
/// assert!(handle.held_lines().is_empty());
/// ```
pub struct ShiftRegisterDriver<P: GpioPlatform> {
    platform: P,
    specs: [LineSpec; 4],
    lines: Option<ShiftLines<P::Output>>,
    register: RegisterState,
    output_enabled: bool,
}

impl<P: GpioPlatform> ShiftRegisterDriver<P> {
    /// Acquire the four lines, clear the register, and enable the outputs.
    ///
    /// # Errors
    ///
    /// - [`HardwareError::InvalidArgument`](crate::HardwareError::InvalidArgument)
    ///   if two roles share a line number.
    /// - [`HardwareError::ResourceUnavailable`](crate::HardwareError::ResourceUnavailable)
    ///   if a line cannot be acquired.
    ///   Every line acquired before the failure has been released by the time
    ///   this returns.
    pub fn initialize(mut platform: P, config: &LineConfig) -> Result<Self> {
        config.validate()?;
        let specs = config.specs();

        let output_enable = Self::acquire_line(&mut platform, &specs, 0)?;
        let clock = Self::acquire_line(&mut platform, &specs, 1)?;
        let data = Self::acquire_line(&mut platform, &specs, 2)?;
        let store = Self::acquire_line(&mut platform, &specs, 3)?;

        let mut driver = Self {
            platform,
            specs,
            lines: Some(ShiftLines {
                output_enable,
                clock,
                data,
                store,
            }),
            register: RegisterState::ALL_OFF,
            output_enabled: false,
        };

        driver.write(RegisterState::ALL_OFF.bits());
        driver.set_output_enable(true);

        info!(
            clock = config.clock,
            data = config.data,
            store = config.store,
            output_enable = config.output_enable,
            "Shift register initialized"
        );
        Ok(driver)
    }

    /// Acquire `specs[index]` and drive it low, releasing `specs[..index]` on failure.
    fn acquire_line(platform: &mut P, specs: &[LineSpec; 4], index: usize) -> Result<P::Output> {
        let spec = &specs[index];
        match platform.acquire(spec) {
            Ok(mut output) => {
                output.set_level(Level::Low);
                debug!(line = spec.number, label = %spec.label, "Line acquired");
                Ok(output)
            }
            Err(error) => {
                warn!(line = spec.number, label = %spec.label, %error, "Line request failed");
                for acquired in specs[..index].iter().rev() {
                    platform.release(acquired);
                }
                Err(error)
            }
        }
    }

    /// Shift `value` out to the register and latch it.
    ///
    /// There is no failure signal: the register cannot be read back, so a
    /// write is complete once the store pulse has been issued.
    pub fn write(&mut self, value: u16) {
        self.register = RegisterState::new(value);

        match self.lines.as_mut() {
            Some(lines) => {
                lines.shift_out(value);
                trace!(register = %self.register, "Register shifted out");
            }
            None => warn!(
                register = %self.register,
                "Shift register lines released, write not sent"
            ),
        }
    }

    /// Drive the output-enable line. The register contents are untouched.
    pub fn set_output_enable(&mut self, on: bool) {
        self.output_enabled = on;

        match self.lines.as_mut() {
            Some(lines) => lines.output_enable.set_level(Level::from(on)),
            None => warn!(on, "Shift register lines released, output enable not sent"),
        }
    }

    /// Last value written.
    pub fn register(&self) -> RegisterState {
        self.register
    }

    pub fn output_enabled(&self) -> bool {
        self.output_enabled
    }

    /// Whether the lines are still held.
    pub fn is_active(&self) -> bool {
        self.lines.is_some()
    }

    /// Release the four lines, in reverse acquisition order.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn teardown(&mut self) {
        let Some(lines) = self.lines.take() else {
            return;
        };
        drop(lines);

        for spec in self.specs.iter().rev() {
            self.platform.release(spec);
        }
        info!("Shift register lines released");
    }
}

impl<P: GpioPlatform> Drop for ShiftRegisterDriver<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<P: GpioPlatform> std::fmt::Debug for ShiftRegisterDriver<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiftRegisterDriver")
            .field("register", &self.register)
            .field("output_enabled", &self.output_enabled)
            .field("active", &self.is_active())
            .finish()
    }
}
