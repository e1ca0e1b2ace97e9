//! Supervision of the monitor loop: bounded restarts, schedule gating and
//! cooperative shutdown.

mod config;
pub mod core;
mod retry;
mod schedule;
mod shutdown;


pub use config::SupervisorConfig;
pub use core::{LoopSummary, SupervisedLoop, TickObserver};
pub use retry::should_restart;
pub use schedule::ScheduleGate;
pub use shutdown::ShutdownSignal;
