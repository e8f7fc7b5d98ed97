//! Registry key node (nk) decoding.

use crate::cell::{CellType, KeyNodeFlags};
use crate::error::{RegistryError, Result};
use crate::utils::{read_bytes, read_u16_le, read_u32_le, read_u64_le, NO_OFFSET};

/// Minimum size of a key node structure in bytes.
const KEY_NODE_MIN_SIZE: usize = 76;

/// Offset of the key name in the key node structure.
const KEY_NAME_OFFSET: usize = 0x4C;

/// Key node (nk) view.
///
/// Fixed fields are decoded up front; the name stays a borrowed span of the
/// hive buffer so the dumper can escape it byte for byte.
#[derive(Debug, Clone)]
pub struct KeyNode<'a> {
    /// Flags for this key.
    pub flags: KeyNodeFlags,

    /// Last written timestamp (Windows FILETIME).
    pub last_written: u64,

    /// Number of subkeys.
    pub subkey_count: u32,

    /// Offset to subkey list, `0xFFFFFFFF` when there is none.
    pub subkey_list_offset: u32,

    /// Number of values.
    pub value_count: u32,

    /// Offset to value list.
    pub value_list_offset: u32,

    /// Raw name bytes, `name_length` long.
    pub name: &'a [u8],
}

impl<'a> KeyNode<'a> {
    /// Parses a key node from cell data.
    ///
    /// # Arguments
    ///
    /// * `data` - Cell data (excluding size field, starting with "nk" signature).
    /// * `offset` - Offset of this cell for error reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is malformed or truncated.
    pub fn parse(data: &'a [u8], offset: u32) -> Result<Self> {
        if data.len() < KEY_NODE_MIN_SIZE {
            return Err(RegistryError::truncated(offset, KEY_NODE_MIN_SIZE, data.len()));
        }

        let signature = CellType::KeyNode.signature();
        if &data[0..2] != signature {
            return Err(RegistryError::invalid_signature(signature, &data[0..2]));
        }

        let name_length = read_u16_le(data, 0x48)? as usize;
        let name = read_bytes(data, KEY_NAME_OFFSET, name_length).map_err(|_| {
            RegistryError::truncated(offset, KEY_NAME_OFFSET + name_length, data.len())
        })?;

        Ok(KeyNode {
            flags: KeyNodeFlags::new(read_u16_le(data, 0x02)?),
            last_written: read_u64_le(data, 0x04)?,
            subkey_count: read_u32_le(data, 0x14)?,
            subkey_list_offset: read_u32_le(data, 0x1C)?,
            value_count: read_u32_le(data, 0x24)?,
            value_list_offset: read_u32_le(data, 0x28)?,
            name,
        })
    }

    /// Returns true if this key points at a subkey list.
    pub fn has_subkey_list(&self) -> bool {
        self.subkey_list_offset != NO_OFFSET
    }

    /// Returns true if this key has values.
    pub fn has_values(&self) -> bool {
        self.value_count > 0
    }

    /// Returns true if the name is stored as single-byte characters.
    pub fn is_name_compressed(&self) -> bool {
        self.flags.is_compressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nk(name: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; KEY_NAME_OFFSET];
        data[0..2].copy_from_slice(b"nk");
        data[0x02..0x04].copy_from_slice(&KeyNodeFlags::COMP_NAME.to_le_bytes());
        data[0x04..0x0C].copy_from_slice(&0x01D5_0000_0000_0000u64.to_le_bytes());
        data[0x1C..0x20].copy_from_slice(&NO_OFFSET.to_le_bytes());
        data[0x24..0x28].copy_from_slice(&2u32.to_le_bytes());
        data[0x48..0x4A].copy_from_slice(&(name.len() as u16).to_le_bytes());
        data.extend_from_slice(name);
        data
    }

    #[test]
    fn test_parse_key_node() {
        let data = nk(b"Properties");
        let key = KeyNode::parse(&data, 0x20).unwrap();
        assert_eq!(key.name, b"Properties");
        assert!(key.is_name_compressed());
        assert!(!key.has_subkey_list());
        assert_eq!(key.value_count, 2);
        assert_eq!(key.last_written, 0x01D5_0000_0000_0000);
    }

    #[test]
    fn test_name_overruns_cell() {
        let mut data = nk(b"Name");
        data[0x48] = 40;
        assert!(matches!(
            KeyNode::parse(&data, 0x20),
            Err(RegistryError::TruncatedData { offset: 0x20, .. })
        ));
    }

    #[test]
    fn test_key_node_minimum_size() {
        assert!(KeyNode::parse(&[0u8; 75], 0).is_err());
    }

    #[test]
    fn test_key_node_invalid_signature() {
        let mut data = nk(b"x");
        data[0..2].copy_from_slice(b"vk");
        assert!(matches!(
            KeyNode::parse(&data, 0),
            Err(RegistryError::InvalidSignature { .. })
        ));
    }
}
