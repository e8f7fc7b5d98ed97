//! Value rendering.
//!
//! The rules are tried in a fixed order and the first one that matches
//! decides the text:
//!
//! 1. `REG_DWORD` of 4 bytes: `0x<hex> (<signed>)`
//! 2. device `BOOLEAN` of 1 byte: `true` / `false` / hex byte
//! 3. device `INT16` / `UINT16` of 2 bytes: `0x<hex> (<decimal>)`
//! 4. 8 bytes of `REG_QWORD`, `REG_BINARY` or `REG_NONE` holding a
//!    21st century FILETIME: date and time, then the data in parentheses
//! 5. `REG_QWORD` of 8 bytes: `0x<hex> (<signed>)`
//! 6. string types, or binary data that looks like UTF-16 text
//! 7. binary data that looks like ASCII text
//! 8. comma-separated hex bytes

use crate::cell::{DevPropType, ValueType};
use crate::name::{is_printable, push_escaped_byte, push_escaped_unit};
use crate::timestamp::{format_filetime, TimeBasis};
use crate::value_type::ActiveScopes;
use byteorder::{ByteOrder, LittleEndian};
use std::fmt::Write;

/// First FILETIME shown as a date (2001-01-01 00:00:00 UTC).
pub const FILETIME_WINDOW_START: i64 = 126_227_808_000_000_000;

/// First FILETIME past the window (2101-01-01 00:00:00 UTC).
pub const FILETIME_WINDOW_END: i64 = 157_784_544_000_000_000;

/// Shortest binary value examined for text.
const MIN_TEXT_PROBE: usize = 8;

/// Settings that change how values are rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Do not stop strings at the first NUL.
    pub all_string: bool,
    /// Calendar for FILETIME values.
    pub time_basis: TimeBasis,
}

/// Kind of text found in binary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryText {
    /// At least 3 of 4 code units are printable.
    Utf16,
    /// At least 7 of 8 bytes are printable.
    Ascii,
}

/// Returns true if `ticks` is a FILETIME in 2001..2101.
pub fn is_plausible_filetime(ticks: i64) -> bool {
    (FILETIME_WINDOW_START..FILETIME_WINDOW_END).contains(&ticks)
}

/// Guesses whether `REG_BINARY` / `REG_NONE` data is really text.
///
/// Zero bytes at index 1 and 3 select the UTF-16 hypothesis; otherwise the
/// ASCII one is tried. Either way the first two characters must be printable.
pub fn detect_binary_text(effective: ValueType, data: &[u8]) -> Option<BinaryText> {
    let size = data.len();
    if !effective.is_opaque() || size < MIN_TEXT_PROBE {
        return None;
    }

    if data[1] == 0 && data[3] == 0 {
        let mut units = data.chunks_exact(2).map(LittleEndian::read_u16);
        let leading = [units.next()?, units.next()?];
        if !leading.iter().all(|&u| is_printable(u)) {
            return None;
        }
        let printable = 2 + units.filter(|&u| is_printable(u)).count();
        (printable * 2 * 8 >= size * 6).then_some(BinaryText::Utf16)
    } else if is_printable_byte(data[0]) && is_printable_byte(data[1]) {
        let printable = 2 + data[2..].iter().filter(|&&b| is_printable_byte(b)).count();
        (printable * 8 >= size * 7).then_some(BinaryText::Ascii)
    } else {
        None
    }
}

#[inline]
fn is_printable_byte(byte: u8) -> bool {
    is_printable(u16::from(byte))
}

fn push_hex_list(out: &mut String, data: &[u8]) {
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{:02X}", byte);
    }
}

/// Renders value data and appends it to `out`.
///
/// # Arguments
///
/// * `effective` - Type after subtree remapping.
/// * `raw_type` - Type code as stored in the value cell.
/// * `data` - Materialized data; its length is the logical size.
/// * `scopes` - Subtrees open at the value's key.
pub fn render_value(
    out: &mut String,
    effective: ValueType,
    raw_type: u32,
    data: &[u8],
    scopes: ActiveScopes,
    options: RenderOptions,
) {
    let size = data.len();
    let devprop = if scopes.device_properties {
        DevPropType::from_code(raw_type)
    } else {
        None
    };
    let text = detect_binary_text(effective, data);

    if effective == ValueType::Dword && size == 4 {
        let value = LittleEndian::read_u32(data);
        let _ = write!(out, "0x{:X} ({})", value, value as i32);
    } else if devprop == Some(DevPropType::Boolean) && size == 1 {
        match data[0] {
            0xFF => out.push_str("true"),
            0 => out.push_str("false"),
            other => {
                let _ = write!(out, "{:02X}", other);
            }
        }
    } else if size == 2 && matches!(devprop, Some(DevPropType::Int16 | DevPropType::Uint16)) {
        let value = LittleEndian::read_u16(data);
        if devprop == Some(DevPropType::Uint16) {
            let _ = write!(out, "0x{:X} ({})", value, value);
        } else {
            let _ = write!(out, "0x{:X} ({})", value, value as i16);
        }
    } else if size == 8
        && (effective == ValueType::Qword || effective.is_opaque())
        && is_plausible_filetime(LittleEndian::read_i64(data))
    {
        let ticks = LittleEndian::read_u64(data);
        out.push_str(&format_filetime(ticks, options.time_basis, false, false));
        if effective == ValueType::Qword {
            let _ = write!(out, " (0x{:X}; {})", ticks, ticks as i64);
        } else {
            out.push_str(" (");
            push_hex_list(out, data);
            out.push(')');
        }
    } else if effective == ValueType::Qword && size == 8 {
        let value = LittleEndian::read_u64(data);
        let _ = write!(out, "0x{:X} ({})", value, value as i64);
    } else if effective.is_text() || text == Some(BinaryText::Utf16) {
        render_utf16(out, effective, data, options.all_string, text.is_some());
    } else if text == Some(BinaryText::Ascii) {
        data.iter().for_each(|&b| push_escaped_byte(out, b));
    } else {
        push_hex_list(out, data);
    }
}

/// Renders UTF-16LE text.
///
/// Declared strings lose their trailing NULs and, unless `all_string`, stop
/// at the first embedded NUL with ` <...>`. In a multi-string a NUL followed
/// by more text is shown as `<>`. Text found in binary data is shown whole.
fn render_utf16(
    out: &mut String,
    effective: ValueType,
    data: &[u8],
    all_string: bool,
    from_binary: bool,
) {
    let mut units: Vec<u16> = data.chunks_exact(2).map(LittleEndian::read_u16).collect();
    if !from_binary {
        while units.last() == Some(&0) {
            units.pop();
        }
    }

    for (i, &unit) in units.iter().enumerate() {
        if is_printable(unit) {
            out.push(unit as u8 as char);
        } else if unit == 0
            && effective == ValueType::MultiString
            && units.get(i + 1).is_some_and(|&next| next != 0)
        {
            out.push_str("<>");
        } else if unit == 0 && !all_string && !from_binary {
            out.push_str(" <...>");
            break;
        } else {
            push_escaped_unit(out, unit);
        }
    }
}
