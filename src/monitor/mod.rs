//! Switch monitor: the open/closed state machine.
//!
//! Each tick reads the sensor, asks the notification policy what the reading
//! means and sends the resulting messages and event records.

pub mod core;
mod events;


pub use core::SwitchMonitor;
pub use events::{DeliveryFailure, TickOutcome};
