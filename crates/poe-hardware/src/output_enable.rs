//! Global output-enable control.

use crate::port::SharedDriver;
use crate::traits::GpioPlatform;
use std::sync::Arc;
use tracing::info;

/// Gates the register outputs onto the port MOSFETs.
///
/// Disabling cuts power to every port at once while the register keeps its
/// contents, so re-enabling restores exactly the previous per-port state.
pub struct OutputEnableController<P: GpioPlatform> {
    driver: SharedDriver<P>,
}

impl<P: GpioPlatform> OutputEnableController<P> {
    pub(crate) fn new(driver: SharedDriver<P>) -> Self {
        Self { driver }
    }

    pub async fn set_enabled(&self, on: bool) {
        self.driver.lock().await.set_output_enable(on);
        info!("Output enable {}", if on { "On" } else { "Off" });
    }

    pub async fn is_enabled(&self) -> bool {
        self.driver.lock().await.output_enabled()
    }
}

impl<P: GpioPlatform> Clone for OutputEnableController<P> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::HardwareConfig;
    use crate::mock::MockGpio;
    use crate::switch::PoeSwitch;
    use crate::types::Level;
    use poe_core::VoltageClass;

    #[tokio::test(start_paused = true)]
    async fn test_disable_keeps_port_configuration() {
        let (gpio, handle) = MockGpio::new();
        let switch = PoeSwitch::initialize(gpio, &HardwareConfig::default()).unwrap();
        switch.ports().set_port(5, VoltageClass::V24).await.unwrap();
        let configured = switch.register().await;

        switch.output_enable().set_enabled(false).await;
        assert!(!switch.output_enable().is_enabled().await);
        assert_eq!(handle.register().outputs(), None);
        assert_eq!(switch.register().await, configured);

        switch.output_enable().set_enabled(true).await;
        assert!(switch.output_enable().is_enabled().await);
        assert_eq!(handle.register().outputs(), Some(configured.bits()));
    }

    #[tokio::test]
    async fn test_toggle_does_not_shift() {
        let (gpio, handle) = MockGpio::new();
        let switch = PoeSwitch::initialize(gpio, &HardwareConfig::default()).unwrap();
        let frames = handle.latched_frames().len();

        switch.output_enable().set_enabled(false).await;
        switch.output_enable().set_enabled(true).await;

        assert_eq!(handle.latched_frames().len(), frames);
        assert_eq!(handle.level(7), Some(Level::High));
    }
}
