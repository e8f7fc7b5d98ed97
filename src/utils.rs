//! Little-endian field readers and offset helpers.
//!
//! Every structure in the hive is decoded through these accessors: fields are
//! read by explicit position and width from a byte slice, never by overlaying
//! a typed record on the buffer.

use crate::error::{RegistryError, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Offset where hive bins start (after base block).
pub const HBIN_START_OFFSET: u32 = 0x1000;

/// Offset value used by key cells to mark "no list".
pub const NO_OFFSET: u32 = 0xFFFF_FFFF;

#[inline]
fn field(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    match offset.checked_add(len) {
        Some(end) if end <= data.len() => Ok(&data[offset..end]),
        _ => Err(RegistryError::truncated(
            offset as u32,
            len,
            data.len().saturating_sub(offset),
        )),
    }
}

/// Reads a u16 from a byte slice at the given offset.
pub fn read_u16_le(data: &[u8], offset: usize) -> Result<u16> {
    Ok(LittleEndian::read_u16(field(data, offset, 2)?))
}

/// Reads a u32 from a byte slice at the given offset.
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    Ok(LittleEndian::read_u32(field(data, offset, 4)?))
}

/// Reads an i32 from a byte slice at the given offset.
pub fn read_i32_le(data: &[u8], offset: usize) -> Result<i32> {
    Ok(LittleEndian::read_i32(field(data, offset, 4)?))
}

/// Reads a u64 from a byte slice at the given offset.
pub fn read_u64_le(data: &[u8], offset: usize) -> Result<u64> {
    Ok(LittleEndian::read_u64(field(data, offset, 8)?))
}

/// Returns `len` bytes starting at `offset`, or a truncation error.
pub fn read_bytes(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    field(data, offset, len)
}

/// Calculates XOR checksum for the first 508 bytes of the base block.
pub fn calculate_checksum(data: &[u8]) -> u32 {
    data.get(..0x1FC)
        .map(|header| {
            header
                .chunks_exact(4)
                .fold(0u32, |acc, dword| acc ^ LittleEndian::read_u32(dword))
        })
        .unwrap_or(0)
}

/// Converts a relative cell offset to an absolute hive offset.
///
/// Cell offsets in the registry are relative to the first hbin (at 0x1000).
///
/// # Errors
///
/// Returns `RegistryError::InvalidOffset` if the offset would overflow.
#[inline]
pub fn cell_offset_to_absolute(cell_offset: u32, hive_size: usize) -> Result<usize> {
    cell_offset
        .checked_add(HBIN_START_OFFSET)
        .map(|abs| abs as usize)
        .ok_or_else(|| RegistryError::invalid_offset(cell_offset, hive_size))
}
