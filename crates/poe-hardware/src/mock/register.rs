//! Simulated serial-in, parallel-out shift register.
//!
//! Replays line events the way a 74HC595-class part reacts to them: the data
//! line is sampled into the shift chain on each rising clock edge, and the
//! chain is copied to the output latches on each rising store edge. Tests use
//! it to check what the hardware would actually end up showing, rather than
//! what the driver believes it wrote.

use super::gpio::LineEvent;
use crate::types::{Level, LineRole};

/// Contents of the output latches after one store pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Value latched to the parallel outputs.
    pub value: u16,

    /// Clock pulses since the previous store pulse.
    pub clocks: u32,
}

/// State machine of the physical register.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRegister {
    shift_chain: u16,
    latched: u16,
    data: bool,
    clock_high: bool,
    store_high: bool,
    output_enabled: bool,
    clocks_since_store: u32,
    sampled: Vec<bool>,
    frames: Vec<Frame>,
}

impl SimulatedRegister {
    /// Build a register by replaying `events` from power-on.
    pub fn replay(events: &[LineEvent]) -> Self {
        let mut register = Self::default();
        for event in events {
            register.apply(event);
        }
        register
    }

    pub fn apply(&mut self, event: &LineEvent) {
        let high = event.level == Level::High;
        match event.role {
            LineRole::Data => self.data = high,
            LineRole::Clock => {
                if high && !self.clock_high {
                    self.shift_chain = (self.shift_chain << 1) | u16::from(self.data);
                    self.sampled.push(self.data);
                    self.clocks_since_store += 1;
                }
                self.clock_high = high;
            }
            LineRole::Store => {
                if high && !self.store_high {
                    self.latched = self.shift_chain;
                    self.frames.push(Frame {
                        value: self.latched,
                        clocks: self.clocks_since_store,
                    });
                    self.clocks_since_store = 0;
                }
                self.store_high = high;
            }
            LineRole::OutputEnable => self.output_enabled = high,
        }
    }

    /// Value held in the output latches.
    pub fn latched(&self) -> u16 {
        self.latched
    }

    /// Value driven onto the port MOSFETs, `None` while outputs are disabled.
    pub fn outputs(&self) -> Option<u16> {
        self.output_enabled.then_some(self.latched)
    }

    pub fn output_enabled(&self) -> bool {
        self.output_enabled
    }

    /// Every latch event, oldest first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Data bits in the order they were clocked in.
    pub fn sampled_bits(&self) -> &[bool] {
        &self.sampled
    }
}
