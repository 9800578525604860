//! Power controller front end.
//!
//! [`PoeSwitch`] owns the single lock around the shift register driver. Every
//! path that touches the register or the lines goes through it: per-port
//! requests via [`PortController`], output gating via
//! [`OutputEnableController`], and the raw register override. Holding the lock
//! for the whole of each request keeps shift-out sequences from interleaving.
//!
//! # Lifecycle
//!
//! 1. [`PoeSwitch::initialize`] acquires the lines and clears the register
//! 2. Hand out [`ports`](PoeSwitch::ports) / [`output_enable`](PoeSwitch::output_enable)
//!    or clone the switch to whatever serves requests
//! 3. [`PoeSwitch::teardown`] releases the lines before the process exits
//!
//! # Examples
//!
//! ```
//! use poe_core::VoltageClass;
//! use poe_hardware::config::HardwareConfig;
//! use poe_hardware::mock::MockGpio;
//! use poe_hardware::PoeSwitch;
//!
//! #[tokio::main]
//! async fn main() -> poe_hardware::Result<()> {
//!     let (gpio, handle) = MockGpio::new();
//!     let config = HardwareConfig { settle_delay_ms: 0, ..HardwareConfig::default() };
//!     let switch = PoeSwitch::initialize(gpio, &config)?;
//!
//!     switch.ports().set_port(3, VoltageClass::V48).await?;
//!     assert_eq!(switch.register().await.bits(), 0x0040);
//!
//!     switch.teardown().await;
//!     assert!(handle.held_lines().is_empty());
//!     Ok(())
//! }
//! ```

use crate::config::HardwareConfig;
use crate::driver::ShiftRegisterDriver;
use crate::error::Result;
use crate::output_enable::OutputEnableController;
use crate::port::{PortController, SharedDriver};
use crate::traits::GpioPlatform;
use poe_core::constants::PORT_COUNT;
use poe_core::{RegisterState, VoltageClass};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Point-in-time view of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchStatus {
    pub register: RegisterState,
    pub output_enabled: bool,

    /// Decoded port states by index; `None` marks both enable bits set.
    pub ports: [Option<VoltageClass>; PORT_COUNT],
}

/// Initialized power controller.
pub struct PoeSwitch<P: GpioPlatform> {
    driver: SharedDriver<P>,
    ports: PortController<P>,
    output_enable: OutputEnableController<P>,
}

impl<P: GpioPlatform> PoeSwitch<P> {
    /// Bring up the shift register on `platform`.
    ///
    /// # Errors
    ///
    /// Fails if the wiring is invalid or a line cannot be acquired; no line is
    /// held afterwards in either case.
    pub fn initialize(platform: P, config: &HardwareConfig) -> Result<Self> {
        let driver = ShiftRegisterDriver::initialize(platform, &config.lines)?;
        let driver: SharedDriver<P> = Arc::new(Mutex::new(driver));

        Ok(Self {
            ports: PortController::new(Arc::clone(&driver), config.settle_delay()),
            output_enable: OutputEnableController::new(Arc::clone(&driver)),
            driver,
        })
    }

    pub fn ports(&self) -> &PortController<P> {
        &self.ports
    }

    pub fn output_enable(&self) -> &OutputEnableController<P> {
        &self.output_enable
    }

    /// Write `value` straight to the register.
    ///
    /// Bypasses per-port handling: no settling delay, and nothing stops both
    /// enable bits of a port being set.
    pub async fn set_raw_register(&self, value: u16) {
        let mut driver = self.driver.lock().await;
        info!(register = %RegisterState::new(value), "Raw register write");
        driver.write(value);
    }

    /// Last value written to the register.
    pub async fn register(&self) -> RegisterState {
        self.driver.lock().await.register()
    }

    pub async fn status(&self) -> SwitchStatus {
        let driver = self.driver.lock().await;
        let register = driver.register();
        SwitchStatus {
            register,
            output_enabled: driver.output_enabled(),
            ports: register.ports(),
        }
    }

    /// Release the lines. Later writes only update the mirror.
    pub async fn teardown(&self) {
        let mut driver = self.driver.lock().await;
        if !driver.is_active() {
            warn!("Teardown requested twice");
        }
        driver.teardown();
    }
}

impl<P: GpioPlatform> Clone for PoeSwitch<P> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            ports: self.ports.clone(),
            output_enable: self.output_enable.clone(),
        }
    }
}
