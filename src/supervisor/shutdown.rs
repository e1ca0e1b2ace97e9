//! Cooperative shutdown flag shared between the signal handler and the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

/// Granularity at which sleeps notice a shutdown request.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop after the current tick.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless shutdown is requested first.
    ///
    /// Returns `false` if the sleep was cut short by a shutdown request.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_requested() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }

    /// Request shutdown on Ctrl+C or SIGTERM.
    pub fn install_handler(&self) -> Result<()> {
        let signal = self.clone();
        ctrlc::set_handler(move || signal.request())
            .context("Failed to set Ctrl+C handler")
    }
}
