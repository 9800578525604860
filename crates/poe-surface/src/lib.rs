//! Text control surface for the PoE switch.
//!
//! Exposes the controller as a small tree of named attributes, each read and
//! written as a string:
//!
//! | attribute   | read                          | write                          |
//! |-------------|-------------------------------|--------------------------------|
//! | `name`      | identification string         | read-only                      |
//! | `raw_value` | register as `0x..` hex        | hex, optional `0x`, <= 0xffff  |
//! | `enable`    | `On` / `Off`                  | decimal, non-zero = on         |
//! | `port_N`    | `Off`/`24V`/`48V`/`Undefined` | 24 or 48, anything else = off  |
//!
//! # Examples
//!
//! ```
//! use poe_hardware::mock::MockGpio;
//! use poe_hardware::{HardwareConfig, PoeSwitch};
//! use poe_surface::ControlSurface;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (gpio, _handle) = MockGpio::new();
//!     let config = HardwareConfig { settle_delay_ms: 0, ..HardwareConfig::default() };
//!     let surface = ControlSurface::new(PoeSwitch::initialize(gpio, &config)?);
//!
//!     surface.write_named("port_3", "48").await?;
//!     assert_eq!(surface.read_named("raw_value").await?, "0x40");
//!     assert_eq!(surface.read_named("port_3").await?, "48V");
//!     Ok(())
//! }
//! ```

pub mod attribute;
pub mod error;
pub mod parse;
pub mod surface;

pub use attribute::Attribute;
pub use error::{Result, SurfaceError};
pub use surface::ControlSurface;
