//! Linux sysfs GPIO platform.
//!
//! Lines are claimed by writing their number to `<root>/export`, which makes
//! the kernel create `<root>/gpioN/`. Writing `low` to its `direction`
//! attribute turns the line into an output driven low in one step. Levels are
//! then written to `<root>/gpioN/value`, which is held open for the lifetime
//! of the line.
//!
//! The kernel refuses to export a line that another consumer already holds,
//! so a failed export is reported as
//! [`HardwareError::ResourceUnavailable`].

use crate::error::{HardwareError, Result};
use crate::traits::{DigitalOutput, GpioPlatform};
use crate::types::{Level, LineSpec};
use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// GPIO platform backed by `/sys/class/gpio`.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn line_dir(&self, number: u32) -> PathBuf {
        self.root.join(format!("gpio{number}"))
    }

    /// Export the line and open it as an output. A line that was exported but
    /// could not be configured is unexported again before returning.
    fn open_output(&self, spec: &LineSpec) -> std::io::Result<File> {
        fs::write(self.root.join("export"), spec.number.to_string())?;

        let dir = self.line_dir(spec.number);
        let configured = fs::write(dir.join("direction"), "low")
            .and_then(|()| OpenOptions::new().write(true).open(dir.join("value")));

        if configured.is_err() {
            self.unexport(spec.number);
        }
        configured
    }

    fn unexport(&self, number: u32) {
        if let Err(error) = fs::write(self.root.join("unexport"), number.to_string()) {
            warn!(line = number, %error, "Failed to unexport GPIO");
        }
    }
}

impl GpioPlatform for SysfsGpio {
    type Output = SysfsOutput;

    fn acquire(&mut self, spec: &LineSpec) -> Result<SysfsOutput> {
        let value = self.open_output(spec).map_err(|e| {
            HardwareError::resource_unavailable(spec.number, &spec.label, e.to_string())
        })?;
        debug!(root = %self.root.display(), line = spec.number, "Exported sysfs GPIO");

        Ok(SysfsOutput {
            number: spec.number,
            value,
        })
    }

    fn release(&mut self, spec: &LineSpec) {
        self.unexport(spec.number);
    }
}

/// Output line exported through sysfs.
#[derive(Debug)]
pub struct SysfsOutput {
    number: u32,
    value: File,
}

impl DigitalOutput for SysfsOutput {
    fn set_level(&mut self, level: Level) {
        let byte: &[u8] = if level.is_high() { b"1" } else { b"0" };
        if let Err(error) = self.value.write_all_at(byte, 0) {
            warn!(line = self.number, ?level, %error, "GPIO write failed");
        }
    }
}
