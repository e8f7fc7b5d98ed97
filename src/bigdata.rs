//! Big data block (db) parsing and reassembly.
//!
//! Registry values larger than 16,344 bytes are stored in big data blocks,
//! which consist of a header cell followed by multiple data segments.

use crate::cell::CellType;
use crate::error::{RegistryError, Result};
use crate::utils::{read_u16_le, read_u32_le};
use tracing::debug;

/// Payload bytes carried by every segment except the last.
pub const BIG_DATA_SEGMENT_SIZE: usize = 16344;

/// Big data block header structure.
///
/// Format:
/// ```text
/// Offset  Size  Description
/// 0x00    2     Signature ("db")
/// 0x02    2     Number of segments
/// 0x04    4     Offset to segment list
/// ```
#[derive(Debug, Clone)]
pub struct BigDataBlock {
    /// Number of data segments
    pub segment_count: u16,

    /// Offset to the list of segment offsets
    pub segment_list_offset: u32,
}

impl BigDataBlock {
    /// Minimum size of a big data block header
    const MIN_SIZE: usize = 8;

    /// Returns true if cell data begins with the `db` tag.
    pub fn is_big_data(data: &[u8]) -> bool {
        data.starts_with(CellType::DataBlock.signature())
    }

    /// Parses a big data block header from cell data.
    ///
    /// # Arguments
    ///
    /// * `data` - Cell data (excluding size field, starting with "db" signature)
    /// * `offset` - Offset of this cell for error reporting
    pub fn parse(data: &[u8], offset: u32) -> Result<Self> {
        if data.len() < Self::MIN_SIZE {
            return Err(RegistryError::truncated(offset, Self::MIN_SIZE, data.len()));
        }

        if !Self::is_big_data(data) {
            return Err(RegistryError::invalid_signature(
                CellType::DataBlock.signature(),
                &data[0..2],
            ));
        }

        Ok(BigDataBlock {
            segment_count: read_u16_le(data, 0x02)?,
            segment_list_offset: read_u32_le(data, 0x04)?,
        })
    }

    /// Number of segments needed to hold `length` bytes.
    pub fn segments_needed(length: usize) -> usize {
        length.div_ceil(BIG_DATA_SEGMENT_SIZE)
    }
}

/// Concatenates segments into a buffer of exactly `length` bytes.
///
/// Every segment contributes up to [`BIG_DATA_SEGMENT_SIZE`] bytes; the last
/// one contributes the remainder. `segment` resolves a segment offset to its
/// cell data.
pub fn assemble_segments<'s, F>(
    segment_offsets: &[u32],
    length: usize,
    mut segment: F,
) -> Result<Vec<u8>>
where
    F: FnMut(u32) -> Result<&'s [u8]>,
{
    let needed = BigDataBlock::segments_needed(length);
    if segment_offsets.len() < needed {
        return Err(RegistryError::InvalidFormat(format!(
            "Big data value of {} bytes needs {} segments, found {}",
            length,
            needed,
            segment_offsets.len()
        )));
    }

    let mut data = Vec::with_capacity(length);
    for &offset in &segment_offsets[..needed] {
        let take = (length - data.len()).min(BIG_DATA_SEGMENT_SIZE);
        let chunk = segment(offset)?;
        if chunk.len() < take {
            return Err(RegistryError::truncated(offset, take, chunk.len()));
        }
        data.extend_from_slice(&chunk[..take]);
    }

    debug!(length = data.len(), segments = needed, "Reassembled big data value");
    Ok(data)
}
