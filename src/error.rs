//! Error types for hive decoding and dumping.
//!
//! Every structural problem found while resolving cells is reported as a
//! distinct "malformed hive" variant; the dumper never reads outside the
//! hive buffer.

use std::io;
use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while decoding or dumping a hive.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// I/O error while reading the hive or writing dump output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic signature in header or structure.
    #[error("invalid signature: expected {:?}, found {:?}", String::from_utf8_lossy(.expected), String::from_utf8_lossy(.found))]
    InvalidSignature {
        /// Signature the structure should carry.
        expected: Vec<u8>,
        /// Bytes actually present.
        found: Vec<u8>,
    },

    /// The file does not carry a hive's `regf` or first `hbin` signature.
    #[error("invalid file ('{0}' signature not found)")]
    SignatureNotFound(&'static str),

    /// Invalid hive format or corrupted data.
    #[error("invalid hive format: {0}")]
    InvalidFormat(String),

    /// Cell offset points outside the hive buffer.
    #[error("invalid cell offset {offset:#x} (hive size: {hive_size:#x})")]
    InvalidOffset {
        /// Offending cell offset (relative to the first hbin).
        offset: u32,
        /// Total size of the hive buffer.
        hive_size: usize,
    },

    /// Cell size is invalid or corrupted.
    #[error("invalid cell size {size} at offset {offset:#x}")]
    InvalidCellSize {
        /// Raw size field.
        size: i32,
        /// Cell offset.
        offset: u32,
    },

    /// Hive is too small to be valid.
    #[error("hive too small: {size} bytes (minimum: {minimum} bytes)")]
    HiveTooSmall {
        /// Actual size.
        size: usize,
        /// Minimum accepted size.
        minimum: usize,
    },

    /// Data truncated or incomplete.
    #[error("truncated data at offset {offset:#x}: expected {expected} bytes, got {actual} bytes")]
    TruncatedData {
        /// Offset of the structure being read.
        offset: u32,
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Invalid subkey list type.
    #[error("invalid subkey list type {:?} at offset {offset:#x}", String::from_utf8_lossy(.list_type))]
    InvalidSubkeyList {
        /// Tag found in place of `lf`/`lh`/`li`/`ri`.
        list_type: [u8; 2],
        /// Offset of the list cell.
        offset: u32,
    },

    /// A key cell was reached twice during one walk.
    #[error("subkey cycle detected: key at offset {offset:#x} already visited")]
    CycleDetected {
        /// Offset of the key reached twice.
        offset: u32,
    },

    /// Key nesting is deeper than the configured limit.
    #[error("maximum key depth {max_depth} exceeded at offset {offset:#x}")]
    DepthExceeded {
        /// Configured limit.
        max_depth: usize,
        /// Offset of the key that would exceed it.
        offset: u32,
    },
}

impl RegistryError {
    /// Creates an invalid signature error with context.
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected signature bytes
    /// * `found` - Actual signature bytes found
    pub fn invalid_signature(expected: &[u8], found: &[u8]) -> Self {
        Self::InvalidSignature {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }

    /// Creates an invalid offset error with context.
    pub fn invalid_offset(offset: u32, hive_size: usize) -> Self {
        Self::InvalidOffset { offset, hive_size }
    }

    /// Creates an invalid cell size error with context.
    pub fn invalid_cell_size(size: i32, offset: u32) -> Self {
        Self::InvalidCellSize { size, offset }
    }

    /// Creates a truncated data error.
    pub fn truncated(offset: u32, expected: usize, actual: usize) -> Self {
        Self::TruncatedData {
            offset,
            expected,
            actual,
        }
    }

    /// Returns true if this error describes a structurally broken hive
    /// rather than a failure of the surrounding I/O.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
