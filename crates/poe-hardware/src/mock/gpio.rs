//! Mock GPIO platform for testing and development.
//!
//! Lines handed out by [`MockGpio`] record every level change into a shared
//! log. The paired [`MockGpioHandle`] inspects that log, reports which lines
//! are held, and can make individual lines fail to acquire.

use super::register::{Frame, SimulatedRegister};
use crate::error::{HardwareError, Result};
use crate::traits::{DigitalOutput, GpioPlatform};
use crate::types::{Level, LineRole, LineSpec};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One level change on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    pub line: u32,
    pub role: LineRole,
    pub level: Level,
}

#[derive(Debug, Default)]
struct MockState {
    held: BTreeMap<u32, LineRole>,
    levels: HashMap<u32, Level>,
    events: Vec<LineEvent>,
    unavailable: HashSet<u32>,
    acquired: Vec<u32>,
    released: Vec<u32>,
}

type SharedState = Arc<Mutex<MockState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock GPIO platform.
///
/// # Examples
///
/// ```
/// use poe_hardware::mock::MockGpio;
/// use poe_hardware::traits::GpioPlatform;
/// use poe_hardware::types::{LineRole, LineSpec};
///
/// let (mut gpio, handle) = MockGpio::new();
/// handle.fail_line(14);
///
/// assert!(gpio.acquire(&LineSpec::new(LineRole::Clock, 16)).is_ok());
/// assert!(gpio.acquire(&LineSpec::new(LineRole::Store, 14)).is_err());
/// assert_eq!(handle.held_lines(), vec![16]);
/// ```
#[derive(Debug)]
pub struct MockGpio {
    state: SharedState,
}

impl MockGpio {
    /// Create a new mock platform and the handle that observes it.
    pub fn new() -> (Self, MockGpioHandle) {
        let state = SharedState::default();
        let handle = MockGpioHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new().0
    }
}

impl GpioPlatform for MockGpio {
    type Output = MockOutput;

    fn acquire(&mut self, spec: &LineSpec) -> Result<MockOutput> {
        let mut state = lock(&self.state);

        if state.unavailable.contains(&spec.number) {
            return Err(HardwareError::resource_unavailable(
                spec.number,
                &spec.label,
                "simulated acquisition failure",
            ));
        }
        if state.held.contains_key(&spec.number) {
            return Err(HardwareError::resource_unavailable(
                spec.number,
                &spec.label,
                "line already held",
            ));
        }

        state.held.insert(spec.number, spec.role);
        state.acquired.push(spec.number);

        Ok(MockOutput {
            line: spec.number,
            role: spec.role,
            state: Arc::clone(&self.state),
        })
    }

    fn release(&mut self, spec: &LineSpec) {
        let mut state = lock(&self.state);
        if state.held.remove(&spec.number).is_some() {
            state.released.push(spec.number);
        }
    }
}

/// Output line acquired from a [`MockGpio`].
#[derive(Debug)]
pub struct MockOutput {
    line: u32,
    role: LineRole,
    state: SharedState,
}

impl DigitalOutput for MockOutput {
    fn set_level(&mut self, level: Level) {
        let mut state = lock(&self.state);
        state.levels.insert(self.line, level);
        state.events.push(LineEvent {
            line: self.line,
            role: self.role,
            level,
        });
    }
}

/// Handle for observing and steering a mock platform.
///
/// Cloneable; every clone sees the same platform.
#[derive(Debug, Clone)]
pub struct MockGpioHandle {
    state: SharedState,
}

impl MockGpioHandle {
    /// Make every future acquisition of `line` fail.
    pub fn fail_line(&self, line: u32) {
        lock(&self.state).unavailable.insert(line);
    }

    /// Lines currently held, ascending.
    pub fn held_lines(&self) -> Vec<u32> {
        lock(&self.state).held.keys().copied().collect()
    }

    /// Lines in the order they were acquired.
    pub fn acquire_log(&self) -> Vec<u32> {
        lock(&self.state).acquired.clone()
    }

    /// Lines in the order they were released.
    pub fn release_log(&self) -> Vec<u32> {
        lock(&self.state).released.clone()
    }

    /// Last level driven on `line`, if it was ever driven.
    pub fn level(&self, line: u32) -> Option<Level> {
        lock(&self.state).levels.get(&line).copied()
    }

    /// Every level change so far, oldest first.
    pub fn events(&self) -> Vec<LineEvent> {
        lock(&self.state).events.clone()
    }

    pub fn clear_events(&self) {
        lock(&self.state).events.clear();
    }

    /// Replay the event log through a simulated register.
    pub fn register(&self) -> SimulatedRegister {
        SimulatedRegister::replay(&lock(&self.state).events)
    }

    /// Values latched by each store pulse, oldest first.
    pub fn latched_frames(&self) -> Vec<Frame> {
        self.register().frames().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let (mut gpio, handle) = MockGpio::new();
        let spec = LineSpec::new(LineRole::Data, 15);

        let _line = gpio.acquire(&spec).unwrap();
        assert_eq!(handle.held_lines(), vec![15]);

        gpio.release(&spec);
        assert!(handle.held_lines().is_empty());
        assert_eq!(handle.release_log(), vec![15]);
    }

    #[test]
    fn test_double_acquire_fails() {
        let (mut gpio, _handle) = MockGpio::new();
        let spec = LineSpec::new(LineRole::Data, 15);

        let _line = gpio.acquire(&spec).unwrap();
        let error = gpio.acquire(&spec).unwrap_err();
        assert!(matches!(error, HardwareError::ResourceUnavailable { line: 15, .. }));
    }

    #[test]
    fn test_release_unheld_is_noop() {
        let (mut gpio, handle) = MockGpio::new();
        gpio.release(&LineSpec::new(LineRole::Store, 14));
        assert!(handle.release_log().is_empty());
    }

    #[test]
    fn test_levels_recorded() {
        let (mut gpio, handle) = MockGpio::new();
        let mut line = gpio.acquire(&LineSpec::new(LineRole::Clock, 16)).unwrap();

        assert_eq!(handle.level(16), None);
        line.pulse();

        assert_eq!(handle.level(16), Some(Level::Low));
        let levels: Vec<Level> = handle.events().iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![Level::High, Level::Low]);

        handle.clear_events();
        assert!(handle.events().is_empty());
    }
}
