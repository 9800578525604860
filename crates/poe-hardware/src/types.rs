//! Common types shared across GPIO platforms and the driver.

use poe_core::constants::{
    CLOCK_LINE_LABEL, DATA_LINE_LABEL, OUTPUT_ENABLE_LINE_LABEL, STORE_LINE_LABEL,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logic level of a digital output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> bool {
        level.is_high()
    }
}

/// Function of a line in the shift register interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRole {
    /// Gates the register's latched outputs onto the port MOSFETs.
    OutputEnable,

    /// Shift clock; data is sampled on the rising edge.
    Clock,

    /// Serial data input.
    Data,

    /// Storage clock; copies the shift chain to the outputs on the rising edge.
    Store,
}

impl LineRole {
    /// Acquisition order.
    pub const ALL: [LineRole; 4] = [Self::OutputEnable, Self::Clock, Self::Data, Self::Store];

    /// Default consumer label for the line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OutputEnable => OUTPUT_ENABLE_LINE_LABEL,
            Self::Clock => CLOCK_LINE_LABEL,
            Self::Data => DATA_LINE_LABEL,
            Self::Store => STORE_LINE_LABEL,
        }
    }
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A concrete line to acquire: its role, platform line number, and label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineSpec {
    pub role: LineRole,
    pub number: u32,
    pub label: String,
}

impl LineSpec {
    pub fn new(role: LineRole, number: u32) -> Self {
        Self {
            role,
            number,
            label: role.label().to_string(),
        }
    }
}

impl fmt::Display for LineSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{} ({})", self.number, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(bool::from(Level::High));
    }

    #[test]
    fn test_line_spec_labels() {
        let spec = LineSpec::new(LineRole::Clock, 16);
        assert_eq!(spec.label, "ser_clk");
        assert_eq!(spec.to_string(), "GPIO16 (ser_clk)");
        assert_eq!(LineRole::OutputEnable.label(), "ser_out");
    }

    #[test]
    fn test_acquisition_order_starts_with_output_enable() {
        assert_eq!(LineRole::ALL[0], LineRole::OutputEnable);
        assert_eq!(LineRole::ALL.len(), 4);
    }
}
