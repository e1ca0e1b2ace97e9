//! Daily schedule gate for the monitor loop.
//!
//! Outside the active window the loop skips ticks entirely, so no state
//! changes or notifications happen while gated.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveTime, Utc};

use crate::models::NotifyTimezone;

/// Whether the loop should tick at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleGate {
    /// Always tick (default).
    #[default]
    Always,
    /// Tick only while local wall-clock time is in `[start, end)`.
    /// A window whose end is before its start wraps past midnight.
    Window {
        start: NaiveTime,
        end: NaiveTime,
        timezone: NotifyTimezone,
    },
}

impl ScheduleGate {
    /// Parse a `HH:MM-HH:MM` window interpreted in `timezone`.
    pub fn window(spec: &str, timezone: NotifyTimezone) -> Result<Self> {
        let window: WindowSpec = spec.parse()?;
        Ok(ScheduleGate::Window {
            start: window.start,
            end: window.end,
            timezone,
        })
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self {
            ScheduleGate::Always => true,
            ScheduleGate::Window {
                start,
                end,
                timezone,
            } => {
                let local = timezone.to_local(now).time();
                if start <= end {
                    local >= *start && local < *end
                } else {
                    local >= *start || local < *end
                }
            }
        }
    }
}

impl fmt::Display for ScheduleGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleGate::Always => write!(f, "always"),
            ScheduleGate::Window {
                start,
                end,
                timezone,
            } => write!(
                f,
                "{}-{} ({timezone})",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
        }
    }
}

struct WindowSpec {
    start: NaiveTime,
    end: NaiveTime,
}

impl FromStr for WindowSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((start, end)) = s.trim().split_once('-') else {
            bail!("Invalid schedule window '{s}'. Use HH:MM-HH:MM");
        };
        let parse = |t: &str| {
            NaiveTime::parse_from_str(t.trim(), "%H:%M")
                .with_context(|| format!("Invalid time '{}' in schedule window '{s}'", t.trim()))
        };
        let start = parse(start)?;
        let end = parse(end)?;
        if start == end {
            bail!("Schedule window '{s}' is empty");
        }
        Ok(Self { start, end })
    }
}
