//! Value parsing and formatting for attribute reads and writes.
//!
//! Port writes are lenient: anything that is not a clean 24 or 48 switches the
//! port off. Register and enable writes are strict and reject malformed input
//! before any hardware is touched.

use crate::error::{Result, SurfaceError};
use poe_core::{RegisterState, VoltageClass};

/// Read value of a port whose enable bits are both set.
pub const UNDEFINED_LABEL: &str = "Undefined";

/// Parse a port write.
///
/// Leading whitespace is skipped and the leading run of decimal digits is
/// taken as the voltage. Empty, non-numeric and unsupported values all map to
/// [`VoltageClass::Off`].
pub fn parse_voltage(input: &str) -> VoltageClass {
    let trimmed = input.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);

    digits
        .parse::<u64>()
        .map_or(VoltageClass::Off, VoltageClass::from_volts)
}

/// Parse a `raw_value` write: hex, optional `0x` prefix, at most `0xffff`.
pub fn parse_register(input: &str) -> Result<u16> {
    let value = input.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SurfaceError::invalid_argument(format!(
            "'{value}' is not a hex register value"
        )));
    }

    u16::from_str_radix(digits, 16).map_err(|_| {
        SurfaceError::invalid_argument(format!("register value {value} exceeds 0xffff"))
    })
}

/// Parse an `enable` write: decimal integer, non-zero means on.
pub fn parse_enable(input: &str) -> Result<bool> {
    let value = input.trim();
    value
        .parse::<i64>()
        .map(|n| n != 0)
        .map_err(|_| SurfaceError::invalid_argument(format!("'{value}' is not an integer")))
}

/// Read value of a port field.
pub fn format_port(state: Option<VoltageClass>) -> &'static str {
    state.map_or(UNDEFINED_LABEL, |voltage| voltage.label())
}

/// Read value of `raw_value`, lowercase hex with `0x` prefix.
pub fn format_register(register: RegisterState) -> String {
    format!("{:#x}", register.bits())
}

pub fn format_enable(on: bool) -> &'static str {
    if on { "On" } else { "Off" }
}
