use crate::constants::{
    BIT_24V, BIT_48V, BITS_PER_PORT, MAX_PORT, PORT_COUNT, PORT_FIELD_MASK, REGISTER_WIDTH,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Switch port index (0-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PortIndex(u8);

impl PortIndex {
    pub fn new(port: u8) -> Result<Self> {
        if port > MAX_PORT {
            return Err(Error::PortOutOfRange {
                port: port.into(),
                max: MAX_PORT,
            });
        }
        Ok(Self(port))
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Bit offset of this port's field within the register.
    pub fn shift(&self) -> u32 {
        u32::from(self.0) * BITS_PER_PORT
    }

    /// This port's 2-bit field, shifted into register position.
    pub fn field_mask(&self) -> u16 {
        PORT_FIELD_MASK << self.shift()
    }

    /// Every port, in ascending order.
    pub fn all() -> impl Iterator<Item = PortIndex> {
        (0..PORT_COUNT as u8).map(PortIndex)
    }
}

impl TryFrom<u8> for PortIndex {
    type Error = Error;

    fn try_from(port: u8) -> Result<Self> {
        Self::new(port)
    }
}

impl From<PortIndex> for u8 {
    fn from(port: PortIndex) -> u8 {
        port.0
    }
}

impl FromStr for PortIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let port: u64 = s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_argument(format!("not a port number: {s:?}")))?;
        u8::try_from(port)
            .map_err(|_| Error::PortOutOfRange {
                port,
                max: MAX_PORT,
            })
            .and_then(Self::new)
    }
}

impl fmt::Display for PortIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Power mode of a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoltageClass {
    #[default]
    #[serde(rename = "Off")]
    Off,

    #[serde(rename = "24V")]
    V24,

    #[serde(rename = "48V")]
    V48,
}

impl VoltageClass {
    /// Map a requested voltage to a class.
    ///
    /// Only 24 and 48 select a voltage; every other value switches the port off.
    pub fn from_volts(volts: u64) -> Self {
        match volts {
            24 => Self::V24,
            48 => Self::V48,
            _ => Self::Off,
        }
    }

    /// Unshifted 2-bit field encoding.
    pub fn bits(&self) -> u16 {
        match self {
            Self::Off => 0,
            Self::V24 => BIT_24V,
            Self::V48 => BIT_48V,
        }
    }

    /// Decode an unshifted 2-bit field.
    ///
    /// Returns `None` when both enable bits are set. Nothing in the port path
    /// produces that pattern and the hardware's response to it is undefined,
    /// so it is reported as-is rather than mapped onto either voltage.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits & PORT_FIELD_MASK {
            0 => Some(Self::Off),
            BIT_24V => Some(Self::V24),
            BIT_48V => Some(Self::V48),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Off)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::V24 => "24V",
            Self::V48 => "48V",
        }
    }
}

impl fmt::Display for VoltageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mirror of the 16-bit power-control register.
///
/// Bit `2*port` enables 48V and bit `2*port+1` enables 24V on `port`.
/// All-zero means every port is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterState(u16);

impl RegisterState {
    pub const ALL_OFF: Self = Self(0);

    pub fn new(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Unshifted 2-bit field of `port`.
    pub fn field(&self, port: PortIndex) -> u16 {
        (self.0 & port.field_mask()) >> port.shift()
    }

    /// Decoded state of `port`; `None` if both enable bits are set.
    pub fn port(&self, port: PortIndex) -> Option<VoltageClass> {
        VoltageClass::from_bits(self.field(port))
    }

    /// Register value with `port`'s field replaced by `voltage`.
    pub fn with_port(&self, port: PortIndex, voltage: VoltageClass) -> Self {
        Self((self.0 & !port.field_mask()) | (voltage.bits() << port.shift()))
    }

    pub fn bit(&self, index: u32) -> bool {
        index < REGISTER_WIDTH && (self.0 >> index) & 1 == 1
    }

    /// Bits in shift-out order: bit 15 first, bit 0 last.
    pub fn bits_msb_first(&self) -> impl Iterator<Item = bool> {
        let state = *self;
        (0..REGISTER_WIDTH).rev().map(move |i| state.bit(i))
    }

    /// Decoded state of every port, indexed by port number.
    pub fn ports(&self) -> [Option<VoltageClass>; PORT_COUNT] {
        let mut ports = [None; PORT_COUNT];
        for port in PortIndex::all() {
            ports[usize::from(port.as_u8())] = self.port(port);
        }
        ports
    }
}

impl From<u16> for RegisterState {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl From<RegisterState> for u16 {
    fn from(state: RegisterState) -> u16 {
        state.0
    }
}

impl fmt::Display for RegisterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for RegisterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn port(n: u8) -> PortIndex {
        PortIndex::new(n).unwrap()
    }

    #[rstest]
    #[case(0)]
    #[case(3)]
    #[case(7)]
    fn test_port_index_valid(#[case] n: u8) {
        assert_eq!(PortIndex::new(n).unwrap().as_u8(), n);
    }

    #[rstest]
    #[case(8)]
    #[case(255)]
    fn test_port_index_out_of_range(#[case] n: u8) {
        assert!(matches!(
            PortIndex::new(n),
            Err(Error::PortOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case("0", 0)]
    #[case(" 7\n", 7)]
    fn test_port_index_parse(#[case] input: &str, #[case] expected: u8) {
        let parsed: PortIndex = input.parse().unwrap();
        assert_eq!(parsed.as_u8(), expected);
    }

    #[rstest]
    #[case("8")]
    #[case("1000")]
    #[case("-1")]
    #[case("three")]
    fn test_port_index_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<PortIndex>().is_err());
    }

    #[rstest]
    #[case(0, 0b0000_0000_0000_0011)]
    #[case(3, 0b0000_0000_1100_0000)]
    #[case(7, 0b1100_0000_0000_0000)]
    fn test_field_mask(#[case] n: u8, #[case] mask: u16) {
        assert_eq!(port(n).field_mask(), mask);
    }

    #[rstest]
    #[case(24, VoltageClass::V24)]
    #[case(48, VoltageClass::V48)]
    #[case(0, VoltageClass::Off)]
    #[case(12, VoltageClass::Off)]
    #[case(4824, VoltageClass::Off)]
    fn test_voltage_from_volts(#[case] volts: u64, #[case] expected: VoltageClass) {
        assert_eq!(VoltageClass::from_volts(volts), expected);
    }

    #[test]
    fn test_voltage_encoding() {
        assert_eq!(VoltageClass::Off.bits(), 0b00);
        assert_eq!(VoltageClass::V24.bits(), 0b10);
        assert_eq!(VoltageClass::V48.bits(), 0b01);
    }

    #[test]
    fn test_both_bits_decode_as_undefined() {
        assert_eq!(VoltageClass::from_bits(0b11), None);
        let state = RegisterState::new(0b11 << 4);
        assert_eq!(state.port(port(2)), None);
        assert_eq!(state.port(port(1)), Some(VoltageClass::Off));
    }

    #[test]
    fn test_with_port_scenario() {
        let state = RegisterState::ALL_OFF.with_port(port(3), VoltageClass::V48);
        assert_eq!(state.bits(), 0x0040);
        assert_eq!(state.port(port(3)), Some(VoltageClass::V48));

        let state = state.with_port(port(3), VoltageClass::Off);
        assert_eq!(state, RegisterState::ALL_OFF);
    }

    #[test]
    fn test_with_port_replaces_field() {
        let state = RegisterState::new(0xFFFF).with_port(port(0), VoltageClass::V24);
        assert_eq!(state.bits(), 0xFFFE);

        let state = state.with_port(port(7), VoltageClass::Off);
        assert_eq!(state.bits(), 0x3FFE);
    }

    #[test]
    fn test_bits_msb_first() {
        let bits: Vec<bool> = RegisterState::new(0x8001).bits_msb_first().collect();
        assert_eq!(bits.len(), 16);
        assert!(bits[0]);
        assert!(bits[15]);
        assert!(bits[1..15].iter().all(|b| !b));
    }

    #[test]
    fn test_bit_lookup() {
        let state = RegisterState::new(0x0040);
        assert!(state.bit(6));
        assert!(!state.bit(7));
        assert!(!RegisterState::new(0xFFFF).bit(16));
    }

    #[test]
    fn test_only_voltages_are_active() {
        assert!(!VoltageClass::Off.is_active());
        assert!(VoltageClass::V24.is_active());
        assert!(VoltageClass::V48.is_active());
    }

    #[test]
    fn test_ports_snapshot() {
        let state = RegisterState::new(0x0040 | 0x0002 | (0b11 << 14));
        let ports = state.ports();
        assert_eq!(ports[0], Some(VoltageClass::V24));
        assert_eq!(ports[3], Some(VoltageClass::V48));
        assert_eq!(ports[7], None);
        assert_eq!(ports[5], Some(VoltageClass::Off));
    }

    #[test]
    fn test_register_display() {
        assert_eq!(RegisterState::new(0x40).to_string(), "0x40");
        assert_eq!(RegisterState::ALL_OFF.to_string(), "0x0");
        assert_eq!(format!("{:04x}", RegisterState::new(0x1234)), "1234");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&VoltageClass::V24).unwrap();
        assert_eq!(json, "\"24V\"");

        let port: PortIndex = serde_json::from_str("5").unwrap();
        assert_eq!(port.as_u8(), 5);
        assert!(serde_json::from_str::<PortIndex>("9").is_err());

        let json = serde_json::to_string(&RegisterState::new(0x40)).unwrap();
        assert_eq!(json, "64");
    }
}
