//! Per-port voltage control with power-on sequencing.
//!
//! Energizing a port draws an inrush current. To keep several ports from
//! drawing it at once, every change that turns a port on, or moves it from one
//! voltage to the other, waits out a settling delay before the new value is
//! shifted out. Switching a port off or rewriting its current state never
//! waits. The delay runs while the switch lock is held, so it also holds back
//! every other register write.

use crate::driver::ShiftRegisterDriver;
use crate::error::Result;
use crate::traits::GpioPlatform;
use poe_core::{PortIndex, RegisterState, VoltageClass};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

pub(crate) type SharedDriver<P> = Arc<Mutex<ShiftRegisterDriver<P>>>;

/// Whether moving `port` to `voltage` from `current` needs the settling delay.
///
/// True when the target is an active voltage and the port's field differs
/// from it: off to on, or 24V to 48V and back.
///
/// # Examples
///
/// ```
/// use poe_core::{PortIndex, RegisterState, VoltageClass};
/// use poe_hardware::port::requires_settling;
///
/// let port = PortIndex::new(3).unwrap();
/// let on = RegisterState::ALL_OFF.with_port(port, VoltageClass::V24);
///
/// assert!(requires_settling(RegisterState::ALL_OFF, port, VoltageClass::V24));
/// assert!(requires_settling(on, port, VoltageClass::V48));
/// assert!(!requires_settling(on, port, VoltageClass::V24));
/// assert!(!requires_settling(on, port, VoltageClass::Off));
/// ```
pub fn requires_settling(current: RegisterState, port: PortIndex, voltage: VoltageClass) -> bool {
    voltage.is_active() && current.field(port) != voltage.bits()
}

/// Maps port voltage requests onto register writes.
///
/// Obtained from [`PoeSwitch::ports`](crate::PoeSwitch::ports); every clone
/// shares the switch's lock.
pub struct PortController<P: GpioPlatform> {
    driver: SharedDriver<P>,
    settle_delay: Duration,
}

impl<P: GpioPlatform> PortController<P> {
    pub(crate) fn new(driver: SharedDriver<P>, settle_delay: Duration) -> Self {
        Self {
            driver,
            settle_delay,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Set `port` to `voltage`.
    ///
    /// Waits [`settle_delay`](Self::settle_delay) first when the port is being
    /// energized or switched between voltages. If the returned future is
    /// dropped during that wait, the request is abandoned before any line is
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InvalidArgument`](crate::HardwareError::InvalidArgument)
    /// if `port` is not 0-7; nothing is written in that case.
    pub async fn set_port(&self, port: u8, voltage: VoltageClass) -> Result<()> {
        let port = PortIndex::new(port)?;
        let mut driver = self.driver.lock().await;

        let current = driver.register();
        if requires_settling(current, port, voltage) {
            debug!(
                %port,
                %voltage,
                delay = ?self.settle_delay,
                "Settling before power-on"
            );
            tokio::time::sleep(self.settle_delay).await;
        }

        let next = current.with_port(port, voltage);
        debug!(%port, %voltage, register = %next, "Setting port");
        driver.write(next.bits());
        Ok(())
    }

    /// Decoded state of `port`, `None` if both enable bits are set.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InvalidArgument`](crate::HardwareError::InvalidArgument)
    /// if `port` is not 0-7.
    pub async fn port(&self, port: u8) -> Result<Option<VoltageClass>> {
        let port = PortIndex::new(port)?;
        Ok(self.driver.lock().await.register().port(port))
    }
}

impl<P: GpioPlatform> Clone for PortController<P> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            settle_delay: self.settle_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HardwareError;
    use crate::config::HardwareConfig;
    use crate::mock::{MockGpio, MockGpioHandle};
    use crate::switch::PoeSwitch;
    use rstest::rstest;
    use tokio::time::Instant;

    const SETTLE: Duration = Duration::from_millis(300);

    fn switch() -> (PoeSwitch<MockGpio>, MockGpioHandle) {
        let (gpio, handle) = MockGpio::new();
        let switch = PoeSwitch::initialize(gpio, &HardwareConfig::default()).unwrap();
        (switch, handle)
    }

    /// Run `set_port` and report how long it took on the paused clock.
    async fn timed_set(
        ports: &PortController<MockGpio>,
        port: u8,
        voltage: VoltageClass,
    ) -> Duration {
        let start = Instant::now();
        ports.set_port(port, voltage).await.unwrap();
        start.elapsed()
    }

    /// The paused clock jumps straight to the timer deadline, give or take a
    /// millisecond of timer-wheel rounding.
    fn assert_settled(elapsed: Duration) {
        assert!(
            elapsed >= SETTLE && elapsed <= SETTLE + Duration::from_millis(1),
            "expected a {SETTLE:?} settle, took {elapsed:?}"
        );
    }

    #[rstest]
    #[case(RegisterState::ALL_OFF, VoltageClass::V24, true)]
    #[case(RegisterState::ALL_OFF, VoltageClass::V48, true)]
    #[case(RegisterState::ALL_OFF, VoltageClass::Off, false)]
    #[case(RegisterState::new(0b10 << 4), VoltageClass::V24, false)]
    #[case(RegisterState::new(0b10 << 4), VoltageClass::V48, true)]
    #[case(RegisterState::new(0b01 << 4), VoltageClass::V24, true)]
    #[case(RegisterState::new(0b01 << 4), VoltageClass::Off, false)]
    #[case(RegisterState::new(0b11 << 4), VoltageClass::V48, true)]
    #[case(RegisterState::new(0xFFCF), VoltageClass::Off, false)]
    fn test_requires_settling(
        #[case] current: RegisterState,
        #[case] voltage: VoltageClass,
        #[case] expected: bool,
    ) {
        let port = PortIndex::new(2).unwrap();
        assert_eq!(requires_settling(current, port, voltage), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_port_reads_back_and_leaves_others() {
        let (switch, _handle) = switch();
        let ports = switch.ports();

        ports.set_port(1, VoltageClass::V24).await.unwrap();
        ports.set_port(6, VoltageClass::V48).await.unwrap();

        for port in 0..8u8 {
            let expected = match port {
                1 => VoltageClass::V24,
                6 => VoltageClass::V48,
                _ => VoltageClass::Off,
            };
            assert_eq!(ports.port(port).await.unwrap(), Some(expected));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_port_three() {
        let (switch, handle) = switch();
        let ports = switch.ports();

        ports.set_port(3, VoltageClass::V48).await.unwrap();
        assert_eq!(switch.register().await.bits(), 0x0040);
        assert_eq!(handle.register().outputs(), Some(0x0040));

        ports.set_port(3, VoltageClass::Off).await.unwrap();
        assert_eq!(switch.register().await.bits(), 0x0000);
        assert_eq!(handle.register().outputs(), Some(0x0000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_on_waits() {
        let (switch, _handle) = switch();
        let ports = switch.ports();

        assert_settled(timed_set(ports, 0, VoltageClass::V24).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_does_not_wait() {
        let (switch, _handle) = switch();
        let ports = switch.ports();

        timed_set(ports, 0, VoltageClass::V24).await;
        assert_eq!(timed_set(ports, 0, VoltageClass::V24).await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_voltage_change_waits() {
        let (switch, _handle) = switch();
        let ports = switch.ports();

        timed_set(ports, 4, VoltageClass::V24).await;
        assert_settled(timed_set(ports, 4, VoltageClass::V48).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_power_off_does_not_wait() {
        let (switch, _handle) = switch();
        let ports = switch.ports();

        timed_set(ports, 4, VoltageClass::V24).await;
        assert_eq!(timed_set(ports, 4, VoltageClass::Off).await, Duration::ZERO);
        assert_settled(timed_set(ports, 4, VoltageClass::V24).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_reaches_hardware_only_after_delay() {
        let (switch, handle) = switch();
        let ports = switch.ports();
        ports.set_port(2, VoltageClass::V24).await.unwrap();
        let frames_before = handle.latched_frames().len();

        let early = tokio::time::timeout(
            SETTLE - Duration::from_millis(1),
            ports.set_port(2, VoltageClass::V48),
        )
        .await;

        assert!(early.is_err(), "still settling");
        assert_eq!(handle.latched_frames().len(), frames_before);
        assert_eq!(ports.port(2).await.unwrap(), Some(VoltageClass::V24));

        ports.set_port(2, VoltageClass::V48).await.unwrap();
        assert_eq!(handle.latched_frames().len(), frames_before + 1);
        assert_eq!(handle.register().latched(), 0b01 << 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_port_rejected() {
        let (switch, handle) = switch();
        handle.clear_events();

        let error = switch.ports().set_port(8, VoltageClass::V24).await.unwrap_err();
        assert!(matches!(error, HardwareError::InvalidArgument { .. }));
        assert!(handle.events().is_empty());

        assert!(switch.ports().port(8).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_configuration() {
        let (gpio, _handle) = MockGpio::new();
        let config = HardwareConfig {
            settle_delay_ms: 0,
            ..HardwareConfig::default()
        };
        let switch = PoeSwitch::initialize(gpio, &config).unwrap();

        assert_eq!(
            timed_set(switch.ports(), 0, VoltageClass::V48).await,
            Duration::ZERO
        );
    }
}
