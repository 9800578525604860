//! Register layout and hardware constants.
//!
//! The power controller drives a 16-bit shift register whose parallel outputs
//! switch the per-port PoE MOSFETs. Each port owns a 2-bit field:
//!
//! ```text
//!  bit: 15  14  13  12  11  10   9   8   7   6   5   4   3   2   1   0
//!      24V 48V 24V 48V 24V 48V 24V 48V 24V 48V 24V 48V 24V 48V 24V 48V
//!      \ port 7/\ port 6/\ port 5/\ port 4/\ port 3/\ port 2/\ port 1/\ port 0/
//! ```
//!
//! # Usage
//!
//! ```
//! use poe_core::constants::*;
//!
//! // Port 3 at 48V sets bit 6.
//! assert_eq!(BIT_48V << (3 * BITS_PER_PORT), 0x0040);
//! assert_eq!(PORT_COUNT * BITS_PER_PORT as usize, REGISTER_WIDTH as usize);
//! ```

// ============================================================================
// Register Layout
// ============================================================================

/// Number of switch ports driven by the register.
pub const PORT_COUNT: usize = 8;

/// Highest valid port index.
pub const MAX_PORT: u8 = (PORT_COUNT - 1) as u8;

/// Width of the shift register in bits.
pub const REGISTER_WIDTH: u32 = 16;

/// Bits per port field.
pub const BITS_PER_PORT: u32 = 2;

/// Mask of a single port field before shifting into position.
pub const PORT_FIELD_MASK: u16 = 0b11;

/// 48V enable bit within a port field (even register bit).
pub const BIT_48V: u16 = 0b01;

/// 24V enable bit within a port field (odd register bit).
pub const BIT_24V: u16 = 0b10;

// ============================================================================
// Sequencing
// ============================================================================

/// Settling delay before a port is energized, in milliseconds.
///
/// Ports are brought up one at a time so their inrush currents never overlap.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 300;

// ============================================================================
// Default GPIO Wiring
// ============================================================================

/// Shift clock line.
pub const DEFAULT_CLOCK_LINE: u32 = 16;

/// Serial data line.
pub const DEFAULT_DATA_LINE: u32 = 15;

/// Store (latch) line.
pub const DEFAULT_STORE_LINE: u32 = 14;

/// Output-enable line, drives the register's G# pin through an inverter.
pub const DEFAULT_OUTPUT_ENABLE_LINE: u32 = 7;

pub const CLOCK_LINE_LABEL: &str = "ser_clk";
pub const DATA_LINE_LABEL: &str = "ser_data";
pub const STORE_LINE_LABEL: &str = "ser_store";
pub const OUTPUT_ENABLE_LINE_LABEL: &str = "ser_out";

// ============================================================================
// Identification
// ============================================================================

/// Device name used for the attribute tree.
pub const DEVICE_NAME: &str = "ubnt-poe";

/// Static identification string reported by the `name` attribute.
pub const IDENTIFICATION: &str = "Ubiquiti POE Switch controller";
