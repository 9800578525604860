//! Attribute names of the control surface.

use crate::error::{Result, SurfaceError};
use poe_core::PortIndex;
use std::fmt;
use std::str::FromStr;

const PORT_PREFIX: &str = "port_";

/// One entry of the attribute tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Static identification string, read-only.
    Name,

    /// Whole register as hex.
    RawValue,

    /// Global output enable.
    Enable,

    /// Voltage of one port.
    Port(PortIndex),
}

impl Attribute {
    /// Every attribute in listing order.
    pub fn all() -> Vec<Attribute> {
        let mut attributes = vec![Self::Name, Self::RawValue, Self::Enable];
        attributes.extend(PortIndex::all().map(Self::Port));
        attributes
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Self::Name)
    }
}

impl FromStr for Attribute {
    type Err = SurfaceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "raw_value" => Ok(Self::RawValue),
            "enable" => Ok(Self::Enable),
            _ => s
                .strip_prefix(PORT_PREFIX)
                .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|n| n.parse::<PortIndex>().ok())
                .map(Self::Port)
                .ok_or_else(|| SurfaceError::UnknownAttribute(s.to_string())),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::RawValue => f.write_str("raw_value"),
            Self::Enable => f.write_str("enable"),
            Self::Port(port) => write!(f, "{PORT_PREFIX}{port}"),
        }
    }
}
