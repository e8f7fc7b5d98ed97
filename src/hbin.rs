//! Hive bin (hbin) block check.
//!
//! The cell address space starts with the first hbin at 0x1000. The dumper
//! only needs to confirm that it is there before trusting any cell offset.
//! The rest of the bin header is not read.

use crate::error::{RegistryError, Result};
use crate::utils::HBIN_START_OFFSET;

/// Expected signature for hive bins ("hbin").
pub const HBIN_SIGNATURE: &[u8; 4] = b"hbin";

/// Checks that the whole-file image `data` has an `hbin` signature at 0x1000.
///
/// # Errors
///
/// Returns [`RegistryError::SignatureNotFound`] when the image ends before
/// the first bin or the signature is something else.
pub fn check_first_bin(data: &[u8]) -> Result<()> {
    let start = HBIN_START_OFFSET as usize;
    match data.get(start..start + HBIN_SIGNATURE.len()) {
        Some(signature) if signature == HBIN_SIGNATURE => Ok(()),
        _ => Err(RegistryError::SignatureNotFound("hbin")),
    }
}
