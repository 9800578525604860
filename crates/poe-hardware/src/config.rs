//! Hardware configuration.
//!
//! Every field has a default matching the stock switch wiring, so an empty
//! configuration file is valid.

use crate::error::{HardwareError, Result};
use crate::types::{LineRole, LineSpec};
use poe_core::constants::{
    DEFAULT_CLOCK_LINE, DEFAULT_DATA_LINE, DEFAULT_OUTPUT_ENABLE_LINE, DEFAULT_SETTLE_DELAY_MS,
    DEFAULT_STORE_LINE,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default sysfs GPIO root.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

/// GPIO line numbers of the shift register interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub clock: u32,
    pub data: u32,
    pub store: u32,
    pub output_enable: u32,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            clock: DEFAULT_CLOCK_LINE,
            data: DEFAULT_DATA_LINE,
            store: DEFAULT_STORE_LINE,
            output_enable: DEFAULT_OUTPUT_ENABLE_LINE,
        }
    }
}

impl LineConfig {
    pub fn number(&self, role: LineRole) -> u32 {
        match role {
            LineRole::OutputEnable => self.output_enable,
            LineRole::Clock => self.clock,
            LineRole::Data => self.data,
            LineRole::Store => self.store,
        }
    }

    /// Line specs in acquisition order.
    pub fn specs(&self) -> [LineSpec; 4] {
        LineRole::ALL.map(|role| LineSpec::new(role, self.number(role)))
    }

    /// Reject wiring that maps two roles onto one line.
    pub fn validate(&self) -> Result<()> {
        let specs = self.specs();
        for (i, a) in specs.iter().enumerate() {
            if let Some(b) = specs[i + 1..].iter().find(|b| b.number == a.number) {
                return Err(HardwareError::invalid_argument(format!(
                    "line {} assigned to both {} and {}",
                    a.number, a.role, b.role
                )));
            }
        }
        Ok(())
    }
}

/// Power controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// Shift register wiring.
    pub lines: LineConfig,

    /// Wait before energizing a port, in milliseconds.
    pub settle_delay_ms: u64,

    /// Root of the sysfs GPIO tree.
    pub sysfs_root: PathBuf,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            lines: LineConfig::default(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
        }
    }
}

impl HardwareConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
