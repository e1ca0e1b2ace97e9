//! Linux sysfs GPIO input.
//!
//! `configure` exports the line (if needed) and sets it as an input. The
//! idle-high pull-up the contact relies on is set by wiring or the device
//! tree; sysfs cannot change line bias.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::SensorInput;
use crate::error::HardwareError;
use crate::models::constants::DEFAULT_GPIO_ROOT;

/// How many times to wait for the kernel to create an exported line's files.
const EXPORT_SETTLE_ATTEMPTS: u32 = 10;
const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(20);

/// A GPIO input read through `/sys/class/gpio`.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    pin: u32,
    root: PathBuf,
    active_low: bool,
    configured: bool,
}

impl SysfsGpio {
    pub fn new(pin: u32) -> Self {
        Self::with_root(pin, DEFAULT_GPIO_ROOT)
    }

    /// Use a different sysfs root (containers, tests).
    pub fn with_root(pin: u32, root: impl Into<PathBuf>) -> Self {
        Self {
            pin,
            root: root.into(),
            active_low: false,
            configured: false,
        }
    }

    /// Invert readings, for contacts wired so that open pulls the line low.
    pub fn active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    fn line_dir(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.pin))
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> HardwareError {
        HardwareError::Io {
            sensor_id: self.pin,
            path: path.to_path_buf(),
            source,
        }
    }

    fn export(&self) -> Result<(), HardwareError> {
        let export = self.root.join("export");
        fs::write(&export, self.pin.to_string()).map_err(|e| self.io_error(&export, e))?;
        debug!(pin = self.pin, "exported gpio line");

        let direction = self.line_dir().join("direction");
        for _ in 0..EXPORT_SETTLE_ATTEMPTS {
            if direction.exists() {
                break;
            }
            thread::sleep(EXPORT_SETTLE_DELAY);
        }
        Ok(())
    }
}

impl SensorInput for SysfsGpio {
    fn sensor_id(&self) -> u32 {
        self.pin
    }

    fn configure(&mut self) -> Result<(), HardwareError> {
        if self.configured {
            return Ok(());
        }

        if !self.line_dir().exists() {
            self.export()?;
        }

        let direction = self.line_dir().join("direction");
        let current = fs::read_to_string(&direction).map_err(|e| self.io_error(&direction, e))?;
        if current.trim() != "in" {
            fs::write(&direction, "in").map_err(|e| self.io_error(&direction, e))?;
        }

        self.configured = true;
        debug!(pin = self.pin, root = %self.root.display(), "gpio input configured");
        Ok(())
    }

    fn read(&mut self) -> Result<bool, HardwareError> {
        if !self.configured {
            return Err(HardwareError::NotConfigured {
                sensor_id: self.pin,
            });
        }

        let value_path = self.line_dir().join("value");
        let raw = fs::read_to_string(&value_path).map_err(|e| self.io_error(&value_path, e))?;
        let high = match raw.trim() {
            "1" => true,
            "0" => false,
            other => {
                return Err(HardwareError::InvalidValue {
                    sensor_id: self.pin,
                    value: other.to_string(),
                })
            }
        };

        Ok(high != self.active_low)
    }
}
