//! Sensor inputs for switches.
//!
//! A sensor must be configured once before it is read; configuring again is a
//! no-op. Read failures surface as [`HardwareError`] and are never swallowed.

mod scripted;
mod sysfs;

pub use scripted::{ScriptHandle, ScriptedSensor};
pub use sysfs::SysfsGpio;

use crate::error::HardwareError;

/// Reads the current state of one physical input.
pub trait SensorInput {
    /// Identifier of the input line this sensor reads.
    fn sensor_id(&self) -> u32;

    /// Prepare the input line for reading. Idempotent.
    fn configure(&mut self) -> Result<(), HardwareError>;

    /// `true` means the contact is active (open), `false` inactive (closed).
    fn read(&mut self) -> Result<bool, HardwareError>;
}
