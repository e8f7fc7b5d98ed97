//! Registry hive base block (header) parsing.
//!
//! The base block is the first 4096 bytes (0x1000) of a registry hive file.
//! It carries the format version, which decides whether big-data cells are
//! understood, and the offset of the root key cell.

use crate::error::{RegistryError, Result};
use crate::utils::{calculate_checksum, read_bytes, read_u32_le, read_u64_le};
use encoding_rs::UTF_16LE;
use std::fmt;
use tracing::warn;

/// Size of the base block in bytes.
pub const BASE_BLOCK_SIZE: usize = 4096;

/// Expected signature for a valid registry hive ("regf").
pub const REGF_SIGNATURE: &[u8; 4] = b"regf";

/// Offset of the embedded file name.
const FILE_NAME_OFFSET: usize = 0x30;

/// Length of the file name field (64 UTF-16LE characters).
const FILE_NAME_LENGTH: usize = 128;

/// Offset of the checksum field.
const CHECKSUM_OFFSET: usize = 0x1FC;

/// Registry hive base block header.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BaseBlock {
    /// Primary sequence number.
    pub primary_sequence: u32,

    /// Secondary sequence number.
    pub secondary_sequence: u32,

    /// Last written timestamp (Windows FILETIME).
    pub last_written: u64,

    /// Major version of the hive format.
    pub major_version: u32,

    /// Minor version of the hive format.
    pub minor_version: u32,

    /// Offset to root key cell (relative to first hbin).
    pub root_cell_offset: u32,

    /// Length of hive bins data in bytes.
    pub hive_length: u32,

    /// Embedded file name, usually the tail of the hive's original path.
    pub file_name: String,

    /// Stored checksum (XOR of first 508 bytes).
    pub checksum: u32,
}

impl BaseBlock {
    /// Parses a base block from raw bytes.
    ///
    /// Only the `regf` signature is enforced. A checksum mismatch, an
    /// unusual version or mismatched sequence numbers are logged and
    /// tolerated, since the dump only needs the root offset and the version.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is missing or the data is shorter
    /// than a base block.
    pub fn parse(data: &[u8]) -> Result<Self> {
        check_signature(data)?;

        if data.len() < BASE_BLOCK_SIZE {
            return Err(RegistryError::HiveTooSmall {
                size: data.len(),
                minimum: BASE_BLOCK_SIZE,
            });
        }

        let checksum = read_u32_le(data, CHECKSUM_OFFSET)?;
        let calculated = calculate_checksum(data);
        if checksum != calculated {
            warn!(
                stored = %format!("{:#x}", checksum),
                calculated = %format!("{:#x}", calculated),
                "Base block checksum mismatch"
            );
        }

        let block = BaseBlock {
            primary_sequence: read_u32_le(data, 0x04)?,
            secondary_sequence: read_u32_le(data, 0x08)?,
            last_written: read_u64_le(data, 0x0C)?,
            major_version: read_u32_le(data, 0x14)?,
            minor_version: read_u32_le(data, 0x18)?,
            root_cell_offset: read_u32_le(data, 0x24)?,
            hive_length: read_u32_le(data, 0x28)?,
            file_name: decode_file_name(read_bytes(data, FILE_NAME_OFFSET, FILE_NAME_LENGTH)?),
            checksum,
        };

        if block.major_version != 1 || !(3..=6).contains(&block.minor_version) {
            warn!(
                major = block.major_version,
                minor = block.minor_version,
                "Unexpected hive format version"
            );
        }

        if !block.is_consistent() {
            warn!(
                primary = block.primary_sequence,
                secondary = block.secondary_sequence,
                "Hive was not cleanly written, sequence numbers differ"
            );
        }

        Ok(block)
    }

    /// Returns true if the hive is in a consistent state.
    ///
    /// The hive is consistent when primary and secondary sequence numbers match.
    pub fn is_consistent(&self) -> bool {
        self.primary_sequence == self.secondary_sequence
    }

    /// Returns true if this format version stores large values in `db` cells.
    pub fn supports_big_data(&self) -> bool {
        self.major_version > 1 || self.minor_version > 3
    }
}

/// Checks that `data` starts with the `regf` signature.
pub fn check_signature(data: &[u8]) -> Result<()> {
    if data.get(0..4) != Some(REGF_SIGNATURE.as_slice()) {
        return Err(RegistryError::SignatureNotFound("regf"));
    }
    Ok(())
}

fn decode_file_name(raw: &[u8]) -> String {
    let (decoded, _) = UTF_16LE.decode_without_bom_handling(raw);
    decoded.trim_end_matches('\0').to_string()
}

impl fmt::Display for BaseBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "regf {}.{} root={:#x} length={:#x} name={:?}",
            self.major_version,
            self.minor_version,
            self.root_cell_offset,
            self.hive_length,
            self.file_name
        )
    }
}
