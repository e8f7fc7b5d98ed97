//! Printable escaping of key and value names.
//!
//! Names are copied through when they are printable ASCII; every other
//! character becomes `<XX>` (or `<XXXX>` for UTF-16 code units above 0xFF).

use byteorder::{ByteOrder, LittleEndian};
use std::fmt::Write;

/// Returns true for the characters copied through literally.
#[inline]
pub fn is_printable(unit: u16) -> bool {
    (32..127).contains(&unit)
}

/// Appends one UTF-16 code unit, escaping it when not printable.
#[inline]
pub fn push_escaped_unit(out: &mut String, unit: u16) {
    if is_printable(unit) {
        out.push(unit as u8 as char);
    } else if unit < 0x100 {
        let _ = write!(out, "<{:02X}>", unit);
    } else {
        let _ = write!(out, "<{:04X}>", unit);
    }
}

/// Appends one byte, escaping it as `<XX>` when not printable.
#[inline]
pub fn push_escaped_byte(out: &mut String, byte: u8) {
    if is_printable(u16::from(byte)) {
        out.push(byte as char);
    } else {
        let _ = write!(out, "<{:02X}>", byte);
    }
}

/// Appends the escaped form of a raw name to `out`.
///
/// A compressed name holds one byte per character; otherwise the bytes are
/// UTF-16LE code units and a trailing odd byte is ignored.
pub fn append_name(out: &mut String, raw: &[u8], compressed: bool) {
    if compressed {
        raw.iter().for_each(|&b| push_escaped_byte(out, b));
    } else {
        raw.chunks_exact(2)
            .for_each(|unit| push_escaped_unit(out, LittleEndian::read_u16(unit)));
    }
}

/// Returns the escaped form of a raw name.
pub fn escape_name(raw: &[u8], compressed: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    append_name(&mut out, raw, compressed);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn utf16(units: &[u16]) -> Vec<u8> {
        units.iter().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn test_compressed_name() {
        assert_eq!(escape_name(b"ControlSet001", true), "ControlSet001");
        assert_eq!(escape_name(b"a\x7fb\xe9\x1f", true), "a<7F>b<E9><1F>");
    }

    #[test]
    fn test_utf16_name() {
        assert_eq!(escape_name(&utf16(&[0x41, 0x42]), false), "AB");
        assert_eq!(escape_name(&utf16(&[0x41, 0xE9, 0x20AC]), false), "A<E9><20AC>");
        assert_eq!(escape_name(&utf16(&[0x00, 0x7E]), false), "<00>~");
    }

    #[test]
    fn test_odd_utf16_length() {
        assert_eq!(escape_name(&[0x41, 0x00, 0x42], false), "A");
    }

    #[test]
    fn test_appends_without_separator() {
        let mut path = String::from("/ROOT/");
        append_name(&mut path, b"Key", true);
        assert_eq!(path, "/ROOT/Key");
    }

    proptest! {
        #[test]
        fn prop_printable_bytes_round_trip(name in "[ -~]{0,64}") {
            prop_assert_eq!(escape_name(name.as_bytes(), true), name.clone());
            let units: Vec<u16> = name.encode_utf16().collect();
            prop_assert_eq!(escape_name(&utf16(&units), false), name);
        }

        #[test]
        fn prop_unprintable_byte_escaped(byte in any::<u8>().prop_filter("unprintable", |b| !(32..127).contains(b))) {
            prop_assert_eq!(escape_name(&[byte], true), format!("<{:02X}>", byte));
        }

        #[test]
        fn prop_unit_escape_width(unit in any::<u16>().prop_filter("unprintable", |u| !(32..127).contains(u))) {
            let escaped = escape_name(&unit.to_le_bytes(), false);
            let width = if unit < 0x100 { 2 } else { 4 };
            prop_assert_eq!(escaped.len(), width + 2);
            prop_assert_eq!(u16::from_str_radix(&escaped[1..escaped.len() - 1], 16).unwrap(), unit);
        }
    }
}
