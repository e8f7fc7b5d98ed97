//! FILETIME rendering.

use chrono::{DateTime, Local, Utc};

/// FILETIME ticks (100 ns) per second.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Seconds between 1601-01-01 and 1970-01-01.
const FILETIME_UNIX_DIFF: i64 = 11_644_473_600;

/// Calendar used when rendering times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeBasis {
    /// The machine's local time zone.
    #[default]
    Local,
    /// Coordinated universal time.
    Utc,
}

/// Converts FILETIME ticks to a UTC date/time, truncated to whole seconds.
pub fn filetime_to_datetime(ticks: u64) -> Option<DateTime<Utc>> {
    let seconds = (ticks / TICKS_PER_SECOND) as i64 - FILETIME_UNIX_DIFF;
    DateTime::from_timestamp(seconds, 0)
}

/// Formats FILETIME ticks as `YYYY-MM-DD HH:MM:SS`.
///
/// With `full`, the sub-second remainder follows as `.fffffff`; with
/// `bracketed`, the result is wrapped as `[...] ` for use as a line prefix.
pub fn format_filetime(ticks: u64, basis: TimeBasis, full: bool, bracketed: bool) -> String {
    const PATTERN: &str = "%Y-%m-%d %H:%M:%S";

    let mut text = match filetime_to_datetime(ticks) {
        Some(utc) => match basis {
            TimeBasis::Local => utc.with_timezone(&Local).format(PATTERN).to_string(),
            TimeBasis::Utc => utc.format(PATTERN).to_string(),
        },
        None => String::from("0000-00-00 00:00:00"),
    };

    if full {
        text.push_str(&format!(".{:07}", ticks % TICKS_PER_SECOND));
    }

    if bracketed {
        format!("[{}] ", text)
    } else {
        text
    }
}
