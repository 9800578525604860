//! Configuration file loading.

use anyhow::{Context, Result};
use poe_hardware::HardwareConfig;
use std::path::Path;

/// Load the hardware configuration from `path`, or the defaults when no file
/// is given.
///
/// Every key is optional:
///
/// ```toml
/// settle_delay_ms = 300
/// sysfs_root = "/sys/class/gpio"
///
/// [lines]
/// clock = 16
/// data = 15
/// store = 14
/// output_enable = 7
/// ```
pub fn load(path: Option<&Path>) -> Result<HardwareConfig> {
    let Some(path) = path else {
        return Ok(HardwareConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {path:?}"))?;
    let config: HardwareConfig =
        toml::from_str(&text).with_context(|| format!("Invalid config file: {path:?}"))?;
    config.lines.validate()?;

    Ok(config)
}
