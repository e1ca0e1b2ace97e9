use std::time::Duration;

/// Default number of seconds a switch may stay open before the first reminder.
pub const DEFAULT_THRESHOLD_SECS: f64 = 30.0;

/// Each "still open" reminder multiplies the backoff interval by this factor.
pub const BACKOFF_GROWTH_FACTOR: f64 = 2.0;

/// Maximum number of times the supervisor starts the monitor loop before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Fixed delay between monitor restarts.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(1000);

/// Delay between ticks. Zero polls as fast as the sensor allows.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::ZERO;

/// How long the loop idles between schedule checks while outside the active window.
pub const SCHEDULE_IDLE_INTERVAL: Duration = Duration::from_secs(1);

/// Default switch name when none is configured.
pub const DEFAULT_SWITCH_NAME: &str = "front_door";

/// Wall-clock format used in open/close notification text.
pub const NOTIFY_TIME_FORMAT: &str = "%H:%M:%S";

/// Sortable UTC format used in event log records.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Default sysfs GPIO root on Linux.
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// HTTP timeouts for notification and event log backends.
pub mod http {
    /// Maximum time to establish a TCP connection.
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;

    /// Maximum time for a whole request, connection included.
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
}
