//! Hive buffer access with bounds-checked cell resolution.

use crate::error::{RegistryError, Result};
use crate::hbin::{self, HBIN_SIGNATURE};
use crate::header::{self, BaseBlock, BASE_BLOCK_SIZE};
use crate::key::KeyNode;
use crate::subkey_list::SubkeyList;
use crate::utils::{cell_offset_to_absolute, read_i32_le, read_u32_le};
use crate::value::ValueKey;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

/// A loaded registry hive.
///
/// The whole image stays resident (mapped or owned) and read-only for the
/// lifetime of the hive; every structure is decoded on demand from it.
#[derive(Debug)]
pub struct Hive {
    /// Hive data - either memory-mapped or owned.
    data: HiveData,

    /// Parsed base block header.
    base_block: BaseBlock,
}

/// Represents hive data storage.
#[derive(Debug)]
enum HiveData {
    /// Memory-mapped file data.
    Mapped(Mmap),
    /// Owned data.
    Owned(Vec<u8>),
}

impl HiveData {
    /// Returns a slice of the hive data.
    fn as_slice(&self) -> &[u8] {
        match self {
            HiveData::Mapped(mmap) => mmap,
            HiveData::Owned(data) => data,
        }
    }
}

impl Hive {
    /// Opens a registry hive file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped, or if the
    /// `regf` or `hbin` signature is missing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use regdump::Hive;
    ///
    /// let hive = Hive::open("SYSTEM").unwrap();
    /// ```
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening registry hive");
        let mut file = File::open(&path)?;

        // Too short to hold both signatures; read it so the checks report
        // which one is missing.
        let file_size = file.metadata()?.len() as usize;
        if file_size < BASE_BLOCK_SIZE + HBIN_SIGNATURE.len() {
            let mut data = Vec::with_capacity(file_size);
            file.read_to_end(&mut data)?;
            return Self::from_vec(data);
        }

        // SAFETY: the file is opened read-only and the map lives exactly as
        // long as the Hive. Every access goes through bounds-checked slicing
        // in `cell()`.
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(size = mmap.len(), "Memory mapped hive file");

        Self::from_data(HiveData::Mapped(mmap))
    }

    /// Creates a hive from an owned buffer holding the whole file.
    pub fn from_vec(data: Vec<u8>) -> Result<Self> {
        Self::from_data(HiveData::Owned(data))
    }

    fn from_data(data: HiveData) -> Result<Self> {
        let bytes = data.as_slice();
        header::check_signature(bytes)?;
        hbin::check_first_bin(bytes)?;
        let base_block = BaseBlock::parse(bytes)?;

        debug!(header = %base_block, "Parsed base block");
        Ok(Self { data, base_block })
    }

    /// Returns a reference to the base block header.
    pub fn base_block(&self) -> &BaseBlock {
        &self.base_block
    }

    /// Returns the raw hive image.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Offset of the root key cell.
    pub fn root_offset(&self) -> u32 {
        self.base_block.root_cell_offset
    }

    /// Resolves a cell offset to the cell's data (excluding the size field).
    ///
    /// # Errors
    ///
    /// Fails with a malformed-hive error when the offset or the cell's size
    /// field points outside the buffer.
    pub fn cell(&self, offset: u32) -> Result<&[u8]> {
        let data = self.data.as_slice();
        let abs_offset = cell_offset_to_absolute(offset, data.len())?;

        if abs_offset >= data.len() {
            return Err(RegistryError::invalid_offset(offset, data.len()));
        }

        let size = read_i32_le(data, abs_offset)
            .map_err(|_| RegistryError::truncated(offset, 4, data.len() - abs_offset))?;
        let abs_size = size.unsigned_abs() as usize;

        if abs_size < 4 {
            return Err(RegistryError::invalid_cell_size(size, offset));
        }

        let data_end = abs_offset + abs_size;
        if data_end > data.len() {
            return Err(RegistryError::truncated(
                offset,
                abs_size,
                data.len() - abs_offset,
            ));
        }

        Ok(&data[abs_offset + 4..data_end])
    }

    /// Decodes the key node at `offset`.
    pub fn key_node(&self, offset: u32) -> Result<KeyNode<'_>> {
        KeyNode::parse(self.cell(offset)?, offset)
    }

    /// Decodes the value key at `offset`.
    pub fn value_key(&self, offset: u32) -> Result<ValueKey<'_>> {
        ValueKey::parse(self.cell(offset)?, offset)
    }

    /// Decodes the subkey list at `offset`.
    pub fn subkey_list(&self, offset: u32) -> Result<SubkeyList> {
        SubkeyList::parse(self.cell(offset)?, offset)
    }

    /// Reads `count` value-cell offsets from the value list at `offset`.
    pub fn value_list(&self, offset: u32, count: u32) -> Result<Vec<u32>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let list = self.cell(offset)?;
        let needed = count as usize * 4;
        if list.len() < needed {
            return Err(RegistryError::truncated(offset, needed, list.len()));
        }

        (0..count as usize)
            .map(|i| read_u32_le(list, i * 4))
            .collect()
    }
}
