//! Locating and reassembling value data.

use crate::bigdata::{assemble_segments, BigDataBlock, BIG_DATA_SEGMENT_SIZE};
use crate::error::{RegistryError, Result};
use crate::hive::Hive;
use crate::utils::read_u32_le;
use crate::value::ValueKey;
use std::borrow::Cow;
use tracing::debug;

/// Returns the bytes of a value, exactly as many as will be rendered.
///
/// Inline and directly stored data are borrowed from the hive. Segmented
/// big data is copied into an owned buffer of exactly the logical length,
/// which the caller drops once the value has been rendered.
pub fn materialize<'h>(hive: &'h Hive, value: &ValueKey<'h>) -> Result<Cow<'h, [u8]>> {
    let length = value.data_length() as usize;

    if value.is_inline() {
        let inline = value.inline_bytes;
        return Ok(Cow::Borrowed(&inline[..length.min(inline.len())]));
    }

    if length == 0 {
        return Ok(Cow::Borrowed(&[][..]));
    }

    let cell = hive.cell(value.data_offset)?;

    if length > BIG_DATA_SEGMENT_SIZE
        && hive.base_block().supports_big_data()
        && BigDataBlock::is_big_data(cell)
    {
        return read_big_data(hive, value.data_offset, cell, length).map(Cow::Owned);
    }

    if cell.len() < length {
        return Err(RegistryError::truncated(value.data_offset, length, cell.len()));
    }
    Ok(Cow::Borrowed(&cell[..length]))
}

fn read_big_data(hive: &Hive, offset: u32, cell: &[u8], length: usize) -> Result<Vec<u8>> {
    let block = BigDataBlock::parse(cell, offset)?;
    debug!(
        offset = %format!("{:#x}", offset),
        segments = block.segment_count,
        length,
        "Reading big data value"
    );

    let list = hive.cell(block.segment_list_offset)?;
    let count = block.segment_count as usize;
    if list.len() < count * 4 {
        return Err(RegistryError::truncated(
            block.segment_list_offset,
            count * 4,
            list.len(),
        ));
    }

    let segments = (0..count)
        .map(|i| read_u32_le(list, i * 4))
        .collect::<Result<Vec<_>>>()?;

    assemble_segments(&segments, length, |segment| hive.cell(segment))
}
