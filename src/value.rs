//! Registry value (vk) decoding.

use crate::cell::{CellType, ValueType, VALUE_COMP_NAME};
use crate::error::{RegistryError, Result};
use crate::utils::{read_bytes, read_u16_le, read_u32_le};

/// Minimum size of a value key structure in bytes.
const VALUE_KEY_MIN_SIZE: usize = 0x14;

/// Offset of the value name.
const VALUE_NAME_OFFSET: usize = 0x14;

/// Bit 31 of the size field: data lives in the offset field itself.
pub const DATA_INLINE_FLAG: u32 = 0x8000_0000;

/// Value key (vk) view.
#[derive(Debug, Clone)]
pub struct ValueKey<'a> {
    /// Raw size field (bit 31 = inline flag).
    pub raw_size: u32,

    /// Offset to value data, or the data itself when stored inline.
    pub data_offset: u32,

    /// The four bytes of the offset field, for inline data.
    pub inline_bytes: &'a [u8],

    /// Stored type code, before any subtree remapping.
    pub raw_type: u32,

    /// Flags (0x0001 = name is compressed).
    pub flags: u16,

    /// Raw name bytes; empty for the default value.
    pub name: &'a [u8],
}

impl<'a> ValueKey<'a> {
    /// Parses a value key from cell data.
    ///
    /// # Arguments
    ///
    /// * `data` - Cell data (excluding size field, starting with "vk" signature).
    /// * `offset` - Offset of this cell for error reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is malformed or truncated.
    pub fn parse(data: &'a [u8], offset: u32) -> Result<Self> {
        if data.len() < VALUE_KEY_MIN_SIZE {
            return Err(RegistryError::truncated(offset, VALUE_KEY_MIN_SIZE, data.len()));
        }

        let signature = CellType::ValueKey.signature();
        if &data[0..2] != signature {
            return Err(RegistryError::invalid_signature(signature, &data[0..2]));
        }

        let name_length = read_u16_le(data, 0x02)? as usize;
        let name = read_bytes(data, VALUE_NAME_OFFSET, name_length).map_err(|_| {
            RegistryError::truncated(offset, VALUE_NAME_OFFSET + name_length, data.len())
        })?;

        Ok(ValueKey {
            raw_size: read_u32_le(data, 0x04)?,
            data_offset: read_u32_le(data, 0x08)?,
            inline_bytes: read_bytes(data, 0x08, 4)?,
            raw_type: read_u32_le(data, 0x0C)?,
            flags: read_u16_le(data, 0x10)?,
            name,
        })
    }

    /// Logical data length: the size field without the inline flag.
    pub fn data_length(&self) -> u32 {
        self.raw_size & !DATA_INLINE_FLAG
    }

    /// Returns true if the data is stored in the offset field.
    pub fn is_inline(&self) -> bool {
        self.raw_size & DATA_INLINE_FLAG != 0
    }

    /// Returns true if the name is stored as single-byte characters.
    pub fn is_name_compressed(&self) -> bool {
        self.flags & VALUE_COMP_NAME != 0
    }

    /// Returns true for the unnamed default value.
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// Stored type, before any subtree remapping.
    pub fn value_type(&self) -> ValueType {
        ValueType::from_u32(self.raw_type)
    }
}
