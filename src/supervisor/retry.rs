use crate::error::MonitorError;

/// Determines whether a crashed monitor should be started again.
///
/// Only retryable failures (hardware faults, setup errors) are eligible, and
/// only while the total attempt count is below `max_attempts`. A broken
/// state-machine invariant is never retried.
pub fn should_restart(error: &MonitorError, attempts: u32, max_attempts: u32) -> bool {
    if attempts >= max_attempts {
        return false;
    }
    error.is_retryable()
}
