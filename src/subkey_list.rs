//! Subkey list parsing (lf, lh, li, ri).
//!
//! Registry keys can have multiple subkeys, which are organized in various
//! list structures. Leaf lists point at key cells; an index root points at
//! further leaf lists when a key has very many children.

use crate::error::{RegistryError, Result};
use crate::utils::{read_u16_le, read_u32_le};

/// Subkey list types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubkeyListType {
    /// Index leaf (li) - simple list of offsets.
    IndexLeaf,

    /// Fast leaf (lf) - list with 4-byte name hints.
    FastLeaf,

    /// Hash leaf (lh) - list with name hash hints.
    HashLeaf,

    /// Index root (ri) - list of subkey list offsets.
    IndexRoot,
}

impl SubkeyListType {
    /// Parses a subkey list type from a 2-byte signature.
    pub fn from_signature(sig: &[u8; 2], offset: u32) -> Result<Self> {
        match sig {
            b"li" => Ok(SubkeyListType::IndexLeaf),
            b"lf" => Ok(SubkeyListType::FastLeaf),
            b"lh" => Ok(SubkeyListType::HashLeaf),
            b"ri" => Ok(SubkeyListType::IndexRoot),
            _ => Err(RegistryError::InvalidSubkeyList {
                list_type: *sig,
                offset,
            }),
        }
    }

    /// Size in bytes of one list element.
    fn stride(&self) -> usize {
        match self {
            SubkeyListType::FastLeaf | SubkeyListType::HashLeaf => 8,
            SubkeyListType::IndexLeaf | SubkeyListType::IndexRoot => 4,
        }
    }
}

/// Parsed subkey list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubkeyList {
    /// Leaf list (li, lf or lh) - offsets of key cells. Name hints are dropped.
    Leaf(Vec<u32>),

    /// Index root - offsets of further subkey lists.
    IndexRoot(Vec<u32>),
}

impl SubkeyList {
    /// Parses a subkey list from cell data.
    ///
    /// # Arguments
    ///
    /// * `data` - Cell data (excluding size field).
    /// * `offset` - Offset of this cell for error reporting.
    pub fn parse(data: &[u8], offset: u32) -> Result<Self> {
        if data.len() < 4 {
            return Err(RegistryError::truncated(offset, 4, data.len()));
        }

        let list_type = SubkeyListType::from_signature(&[data[0], data[1]], offset)?;
        let count = read_u16_le(data, 2)? as usize;

        let stride = list_type.stride();
        let expected_size = 4 + count * stride;
        if data.len() < expected_size {
            return Err(RegistryError::truncated(offset, expected_size, data.len()));
        }

        let offsets = (0..count)
            .map(|i| read_u32_le(data, 4 + i * stride))
            .collect::<Result<Vec<_>>>()?;

        Ok(match list_type {
            SubkeyListType::IndexRoot => SubkeyList::IndexRoot(offsets),
            _ => SubkeyList::Leaf(offsets),
        })
    }

    /// Returns the offsets stored in this list.
    pub fn offsets(&self) -> &[u32] {
        match self {
            SubkeyList::Leaf(offsets) | SubkeyList::IndexRoot(offsets) => offsets,
        }
    }

    /// Returns the number of entries in this list.
    pub fn len(&self) -> usize {
        self.offsets().len()
    }

    /// Returns true if this list is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if this is an index root (contains sublists).
    pub fn is_index_root(&self) -> bool {
        matches!(self, SubkeyList::IndexRoot(_))
    }
}
