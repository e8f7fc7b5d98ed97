//! Registry cell type definitions.
//!
//! Cells are the fundamental data structures within registry hives. Each cell
//! has a 2-byte signature that identifies its type. Subkey list tags live in
//! [`crate::subkey_list`].

/// Signatures of the non-list cells the dumper decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    /// Key node (nk) - represents a registry key.
    KeyNode,

    /// Value key (vk) - represents a registry value.
    ValueKey,

    /// Data block (db) - big data block.
    DataBlock,
}

impl CellType {
    /// Returns the 2-byte signature for this cell type.
    pub fn signature(&self) -> &'static [u8; 2] {
        match self {
            CellType::KeyNode => b"nk",
            CellType::ValueKey => b"vk",
            CellType::DataBlock => b"db",
        }
    }
}

/// Flags for key nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNodeFlags(pub u16);

impl KeyNodeFlags {
    /// Key name is in compressed format (ASCII).
    pub const COMP_NAME: u16 = 0x0020;

    /// Creates a new KeyNodeFlags from a u16 value.
    pub fn new(flags: u16) -> Self {
        Self(flags)
    }

    /// Returns true if the specified flag is set.
    pub fn has_flag(&self, flag: u16) -> bool {
        (self.0 & flag) != 0
    }

    /// Returns true if the key name is compressed (ASCII).
    pub fn is_compressed(&self) -> bool {
        self.has_flag(Self::COMP_NAME)
    }
}

/// Value flag: the value name is stored as single-byte characters.
pub const VALUE_COMP_NAME: u16 = 0x0001;

/// Registry value data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// No value type.
    None,

    /// String (null-terminated).
    String,

    /// String with environment variables.
    ExpandString,

    /// Binary data.
    Binary,

    /// 32-bit little-endian integer.
    Dword,

    /// 32-bit big-endian integer.
    DwordBigEndian,

    /// Symbolic link (Unicode).
    Link,

    /// Multiple strings.
    MultiString,

    /// Resource list.
    ResourceList,

    /// Full resource descriptor.
    FullResourceDescriptor,

    /// Resource requirements list.
    ResourceRequirementsList,

    /// 64-bit little-endian integer.
    Qword,

    /// Non-standard type code, including device-property codes.
    Unknown(u32),
}

impl ValueType {
    /// Maps a type code to a value type.
    ///
    /// Codes 0-11 are predefined; anything else is kept as `Unknown`.
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => ValueType::None,
            1 => ValueType::String,
            2 => ValueType::ExpandString,
            3 => ValueType::Binary,
            4 => ValueType::Dword,
            5 => ValueType::DwordBigEndian,
            6 => ValueType::Link,
            7 => ValueType::MultiString,
            8 => ValueType::ResourceList,
            9 => ValueType::FullResourceDescriptor,
            10 => ValueType::ResourceRequirementsList,
            11 => ValueType::Qword,
            _ => ValueType::Unknown(value),
        }
    }

    /// Returns true for the types whose data is UTF-16LE text.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            ValueType::String | ValueType::MultiString | ValueType::ExpandString | ValueType::Link
        )
    }

    /// Returns true for the types whose data may hold unlabelled text or times.
    pub fn is_opaque(&self) -> bool {
        matches!(self, ValueType::Binary | ValueType::None)
    }
}

/// High word marking a device-property type code.
pub const DEVPROP_TYPE_MASK: u32 = 0xFFFF_0000;

/// Device property base types (`DEVPROP_TYPE_*`) found under `Properties` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevPropType {
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    Uint64,
    /// FILETIME.
    FileTime,
    /// One-byte boolean (0xFF true, 0 false).
    Boolean,
    /// UTF-16 string.
    String,
    /// List of UTF-16 strings.
    StringList,
    /// Indirect string reference.
    StringIndirect,
}

impl DevPropType {
    /// Looks up the device property type stored in the low word of a code.
    pub fn from_low_word(code: u16) -> Option<Self> {
        match code {
            0x0004 => Some(DevPropType::Int16),
            0x0005 => Some(DevPropType::Uint16),
            0x0006 => Some(DevPropType::Int32),
            0x0007 => Some(DevPropType::Uint32),
            0x0008 => Some(DevPropType::Int64),
            0x0009 => Some(DevPropType::Uint64),
            0x0010 => Some(DevPropType::FileTime),
            0x0011 => Some(DevPropType::Boolean),
            0x0012 => Some(DevPropType::String),
            0x2012 => Some(DevPropType::StringList),
            0x0019 => Some(DevPropType::StringIndirect),
            _ => None,
        }
    }

    /// Decodes a full 32-bit stored code, which must carry the device high word.
    pub fn from_code(code: u32) -> Option<Self> {
        if code & DEVPROP_TYPE_MASK != DEVPROP_TYPE_MASK {
            return None;
        }
        Self::from_low_word((code & 0xFFFF) as u16)
    }

    /// The standard registry type this device type is shown as, if any.
    pub fn standard_type(&self) -> Option<ValueType> {
        match self {
            DevPropType::Int32 | DevPropType::Uint32 => Some(ValueType::Dword),
            DevPropType::Int64 | DevPropType::Uint64 | DevPropType::FileTime => {
                Some(ValueType::Qword)
            }
            DevPropType::String | DevPropType::StringIndirect => Some(ValueType::String),
            DevPropType::StringList => Some(ValueType::MultiString),
            DevPropType::Int16 | DevPropType::Uint16 | DevPropType::Boolean => None,
        }
    }
}
