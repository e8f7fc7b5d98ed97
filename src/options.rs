//! Dump configuration.

use crate::render::RenderOptions;
use crate::timestamp::TimeBasis;

/// Default limit on key nesting during a walk.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Whether, and how precisely, key timestamps prefix each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimestampMode {
    /// No timestamps.
    #[default]
    Off,
    /// Whole seconds.
    Seconds,
    /// Seconds plus the seven-digit tick remainder.
    Full,
}

/// Options controlling what a dump contains and how lines look.
///
/// # Examples
///
/// ```
/// use regdump::{DumpOptions, TimestampMode};
///
/// let options = DumpOptions::default()
///     .with_hex_type(true)
///     .with_timestamps(TimestampMode::Full);
/// assert!(options.hex_type);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DumpOptions {
    /// Show type and size in hex before the path instead of after it.
    pub hex_type: bool,
    /// Suppress lines for keys without values.
    pub only_values: bool,
    /// Show keys only, each with its timestamp; values are skipped.
    pub only_keys: bool,
    /// Show strings past embedded NULs.
    pub all_string: bool,
    /// Key timestamp prefix.
    pub timestamps: TimestampMode,
    /// Calendar for all rendered times.
    pub time_basis: TimeBasis,
    /// Deepest key nesting accepted before the walk fails.
    pub max_depth: usize,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            hex_type: false,
            only_values: false,
            only_keys: false,
            all_string: false,
            timestamps: TimestampMode::Off,
            time_basis: TimeBasis::Local,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DumpOptions {
    /// Sets hex type/size placement.
    pub fn with_hex_type(mut self, enabled: bool) -> Self {
        self.hex_type = enabled;
        self
    }

    /// Sets values-only mode.
    pub fn with_only_values(mut self, enabled: bool) -> Self {
        self.only_values = enabled;
        self
    }

    /// Sets keys-only mode. Keys-only lines always carry a timestamp.
    pub fn with_only_keys(mut self, enabled: bool) -> Self {
        self.only_keys = enabled;
        if enabled && self.timestamps == TimestampMode::Off {
            self.timestamps = TimestampMode::Seconds;
        }
        self
    }

    /// Sets full-string mode.
    pub fn with_all_string(mut self, enabled: bool) -> Self {
        self.all_string = enabled;
        self
    }

    /// Sets the timestamp prefix.
    pub fn with_timestamps(mut self, mode: TimestampMode) -> Self {
        self.timestamps = mode;
        self
    }

    /// Sets the calendar used for times.
    pub fn with_time_basis(mut self, basis: TimeBasis) -> Self {
        self.time_basis = basis;
        self
    }

    /// Sets the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// True when timestamps include the sub-second remainder.
    pub fn full_time(&self) -> bool {
        self.timestamps == TimestampMode::Full
    }

    /// Settings passed to the value renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            all_string: self.all_string,
            time_basis: self.time_basis,
        }
    }
}
