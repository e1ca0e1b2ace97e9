//! Timezone used for human-readable notification text.
//!
//! State transitions never look at this; all internal timing is UTC.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::constants::NOTIFY_TIME_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// IANA zone with its DST rules.
    Named(Tz),
    Fixed(FixedOffset),
}

/// An IANA zone such as `America/Chicago`, or a fixed offset such as `UTC`,
/// `+02:00` or `-0500`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotifyTimezone {
    zone: Zone,
}

impl NotifyTimezone {
    pub fn utc() -> Self {
        Self {
            zone: Zone::Fixed(Utc.fix()),
        }
    }

    /// UTC offset in effect at `utc`.
    pub fn offset_at(&self, utc: DateTime<Utc>) -> FixedOffset {
        match self.zone {
            Zone::Named(tz) => tz.offset_from_utc_datetime(&utc.naive_utc()).fix(),
            Zone::Fixed(offset) => offset,
        }
    }

    /// Convert a UTC instant into this zone.
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        utc.with_timezone(&self.offset_at(utc))
    }

    /// Wall-clock time of day used in open/close messages.
    pub fn format_time(&self, utc: DateTime<Utc>) -> String {
        self.to_local(utc).format(NOTIFY_TIME_FORMAT).to_string()
    }

    /// Full local timestamp including the offset, e.g. `2024-03-01 18:30:00 +01:00`.
    pub fn format_timestamp(&self, utc: DateTime<Utc>) -> String {
        self.to_local(utc)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string()
    }
}

impl Default for NotifyTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for NotifyTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = match self.zone {
            Zone::Named(tz) => return write!(f, "{}", tz.name()),
            Zone::Fixed(offset) => offset,
        };
        let secs = offset.local_minus_utc();
        if secs == 0 {
            return write!(f, "UTC");
        }
        let sign = if secs < 0 { '-' } else { '+' };
        let abs = secs.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
    }
}

impl FromStr for NotifyTimezone {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            bail!("Timezone cannot be empty");
        }
        if matches!(s.to_ascii_uppercase().as_str(), "UTC" | "Z" | "GMT") {
            return Ok(Self::utc());
        }

        let (sign, rest) = match s.as_bytes()[0] {
            b'+' => (1, &s[1..]),
            b'-' => (-1, &s[1..]),
            _ => match s.parse::<Tz>() {
                Ok(tz) => return Ok(Self { zone: Zone::Named(tz) }),
                Err(_) => bail!(
                    "Invalid timezone '{s}'. Use an IANA name like America/Chicago, UTC, or an offset like +02:00"
                ),
            },
        };

        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            bail!("Invalid timezone offset '{s}'");
        }
        let (hours, minutes) = match digits.len() {
            1 | 2 => (digits.as_str(), "0"),
            4 => digits.split_at(2),
            _ => bail!("Invalid timezone offset '{s}'"),
        };
        let hours: i32 = hours
            .parse()
            .with_context(|| format!("Invalid hours in timezone '{s}'"))?;
        let minutes: i32 = minutes
            .parse()
            .with_context(|| format!("Invalid minutes in timezone '{s}'"))?;
        if hours > 23 || minutes > 59 {
            bail!("Timezone offset '{s}' out of range");
        }

        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .with_context(|| format!("Timezone offset '{s}' out of range"))?;
        Ok(Self {
            zone: Zone::Fixed(offset),
        })
    }
}

impl TryFrom<String> for NotifyTimezone {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NotifyTimezone> for String {
    fn from(tz: NotifyTimezone) -> Self {
        tz.to_string()
    }
}
