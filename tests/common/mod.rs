//! Synthetic hive images for integration tests and benchmarks.
#![allow(dead_code)]

use regdump::Hive;

pub const NO_OFFSET: u32 = 0xFFFF_FFFF;
pub const SEGMENT_SIZE: usize = 16344;

const BASE_BLOCK_SIZE: usize = 0x1000;
const HBIN_SIZE: usize = 0x1000;
const COMP_NAME: u16 = 0x0020;
const ROOT_KEY: u16 = 0x0004;

/// 2019-05-30 12:34:56 UTC plus 1234567 ticks.
pub const KEY_TIME: u64 = 132_036_932_961_234_567;

/// Builds a hive image cell by cell.
///
/// Cells are laid out in one hbin in allocation order; offsets returned by
/// the builder are relative to the first hbin, like offsets in a real hive.
pub struct HiveBuilder {
    bins: Vec<u8>,
    major: u32,
    minor: u32,
}

impl Default for HiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HiveBuilder {
    pub fn new() -> Self {
        let mut bins = vec![0u8; 0x20];
        bins[0..4].copy_from_slice(b"hbin");
        Self {
            bins,
            major: 1,
            minor: 5,
        }
    }

    pub fn with_version(mut self, major: u32, minor: u32) -> Self {
        self.major = major;
        self.minor = minor;
        self
    }

    /// Appends an allocated cell holding `data` and returns its offset.
    pub fn alloc(&mut self, data: &[u8]) -> u32 {
        let offset = self.bins.len() as u32;
        let size = (data.len() + 4 + 7) & !7;
        self.bins.extend_from_slice(&(-(size as i32)).to_le_bytes());
        self.bins.extend_from_slice(data);
        self.bins.resize(offset as usize + size, 0);
        offset
    }

    /// Overwrites a u32 field of the cell at `cell` (field offset relative
    /// to the cell data).
    pub fn patch_u32(&mut self, cell: u32, field: usize, value: u32) {
        let at = cell as usize + 4 + field;
        self.bins[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Key with a compressed name, its values, and an `lf` list of subkeys.
    pub fn key(&mut self, name: &str, values: &[u32], subkeys: &[u32]) -> u32 {
        let list = if subkeys.is_empty() {
            NO_OFFSET
        } else {
            self.list(b"lf", subkeys)
        };
        self.key_with_list(name.as_bytes(), true, KEY_TIME, values, list, subkeys.len() as u32)
    }

    /// Key with full control over name encoding, timestamp and subkey list.
    pub fn key_with_list(
        &mut self,
        name: &[u8],
        compressed: bool,
        timestamp: u64,
        values: &[u32],
        subkey_list: u32,
        subkey_count: u32,
    ) -> u32 {
        let value_list = if values.is_empty() {
            NO_OFFSET
        } else {
            let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
            self.alloc(&bytes)
        };

        let mut nk = vec![0u8; 0x4C];
        nk[0..2].copy_from_slice(b"nk");
        let flags = if compressed { COMP_NAME } else { 0 };
        nk[0x02..0x04].copy_from_slice(&flags.to_le_bytes());
        nk[0x04..0x0C].copy_from_slice(&timestamp.to_le_bytes());
        nk[0x14..0x18].copy_from_slice(&subkey_count.to_le_bytes());
        nk[0x1C..0x20].copy_from_slice(&subkey_list.to_le_bytes());
        nk[0x20..0x24].copy_from_slice(&NO_OFFSET.to_le_bytes());
        nk[0x24..0x28].copy_from_slice(&(values.len() as u32).to_le_bytes());
        nk[0x28..0x2C].copy_from_slice(&value_list.to_le_bytes());
        nk[0x30..0x34].copy_from_slice(&NO_OFFSET.to_le_bytes());
        nk[0x48..0x4A].copy_from_slice(&(name.len() as u16).to_le_bytes());
        nk.extend_from_slice(name);
        self.alloc(&nk)
    }

    /// Subkey list cell. `lf`/`lh` entries carry a zero hash.
    pub fn list(&mut self, tag: &[u8; 2], offsets: &[u32]) -> u32 {
        let mut cell = tag.to_vec();
        cell.extend_from_slice(&(offsets.len() as u16).to_le_bytes());
        for offset in offsets {
            cell.extend_from_slice(&offset.to_le_bytes());
            if tag == b"lf" || tag == b"lh" {
                cell.extend_from_slice(&[0u8; 4]);
            }
        }
        self.alloc(&cell)
    }

    /// Value with a compressed name; data of 4 bytes or less is inline.
    pub fn value(&mut self, name: &str, raw_type: u32, data: &[u8]) -> u32 {
        self.value_raw(name.as_bytes(), true, raw_type, data)
    }

    pub fn value_raw(&mut self, name: &[u8], compressed: bool, raw_type: u32, data: &[u8]) -> u32 {
        if data.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..data.len()].copy_from_slice(data);
            let size = data.len() as u32 | 0x8000_0000;
            self.vk(name, compressed, size, u32::from_le_bytes(inline), raw_type)
        } else {
            let cell = self.alloc(data);
            self.vk(name, compressed, data.len() as u32, cell, raw_type)
        }
    }

    /// Value whose size field and data offset are given directly.
    pub fn vk(&mut self, name: &[u8], compressed: bool, size: u32, data_offset: u32, raw_type: u32) -> u32 {
        let mut vk = vec![0u8; 0x14];
        vk[0..2].copy_from_slice(b"vk");
        vk[0x02..0x04].copy_from_slice(&(name.len() as u16).to_le_bytes());
        vk[0x04..0x08].copy_from_slice(&size.to_le_bytes());
        vk[0x08..0x0C].copy_from_slice(&data_offset.to_le_bytes());
        vk[0x0C..0x10].copy_from_slice(&raw_type.to_le_bytes());
        let flags: u16 = if compressed { 1 } else { 0 };
        vk[0x10..0x12].copy_from_slice(&flags.to_le_bytes());
        vk.extend_from_slice(name);
        self.alloc(&vk)
    }

    /// Value stored as a `db` record over 16344-byte segments.
    pub fn big_value(&mut self, name: &str, raw_type: u32, data: &[u8]) -> u32 {
        let segments: Vec<u32> = data
            .chunks(SEGMENT_SIZE)
            .map(|chunk| self.alloc(chunk))
            .collect();
        let list: Vec<u8> = segments.iter().flat_map(|s| s.to_le_bytes()).collect();
        let list = self.alloc(&list);

        let mut db = b"db".to_vec();
        db.extend_from_slice(&(segments.len() as u16).to_le_bytes());
        db.extend_from_slice(&list.to_le_bytes());
        let db = self.alloc(&db);

        self.vk(name.as_bytes(), true, data.len() as u32, db, raw_type)
    }

    /// Finishes the image with `root` as the root key.
    pub fn finish(mut self, root: u32) -> Vec<u8> {
        let bin_len = self.bins.len().div_ceil(HBIN_SIZE) * HBIN_SIZE;
        self.bins.resize(bin_len, 0);
        self.bins[0x08..0x0C].copy_from_slice(&(bin_len as u32).to_le_bytes());

        // Mark the root key cell as the root.
        let flags_at = root as usize + 4 + 2;
        if flags_at + 2 <= self.bins.len() && &self.bins[root as usize + 4..root as usize + 6] == b"nk" {
            let flags = u16::from_le_bytes([self.bins[flags_at], self.bins[flags_at + 1]]) | ROOT_KEY;
            self.bins[flags_at..flags_at + 2].copy_from_slice(&flags.to_le_bytes());
        }

        let mut image = vec![0u8; BASE_BLOCK_SIZE];
        image[0..4].copy_from_slice(b"regf");
        image[0x04..0x08].copy_from_slice(&1u32.to_le_bytes());
        image[0x08..0x0C].copy_from_slice(&1u32.to_le_bytes());
        image[0x0C..0x14].copy_from_slice(&KEY_TIME.to_le_bytes());
        image[0x14..0x18].copy_from_slice(&self.major.to_le_bytes());
        image[0x18..0x1C].copy_from_slice(&self.minor.to_le_bytes());
        image[0x20..0x24].copy_from_slice(&1u32.to_le_bytes());
        image[0x24..0x28].copy_from_slice(&root.to_le_bytes());
        image[0x28..0x2C].copy_from_slice(&(bin_len as u32).to_le_bytes());
        let file_name: Vec<u8> = "SYNTHETIC".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        image[0x30..0x30 + file_name.len()].copy_from_slice(&file_name);

        let checksum = image[..0x1FC]
            .chunks_exact(4)
            .fold(0u32, |acc, dword| acc ^ u32::from_le_bytes([dword[0], dword[1], dword[2], dword[3]]));
        image[0x1FC..0x200].copy_from_slice(&checksum.to_le_bytes());

        image.extend_from_slice(&self.bins);
        image
    }

    pub fn hive(self, root: u32) -> Hive {
        Hive::from_vec(self.finish(root)).unwrap()
    }
}

/// UTF-16LE bytes of `text`.
pub fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

/// UTF-16LE bytes of `text` with a terminating NUL.
pub fn utf16z(text: &str) -> Vec<u8> {
    let mut bytes = utf16(text);
    bytes.extend_from_slice(&[0, 0]);
    bytes
}
