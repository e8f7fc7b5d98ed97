//! # Windows Registry Hive Dumper
//!
//! Reads a registry hive file and prints every key and value as one line
//! of text, with decoded data.
//!
//! ## Features
//!
//! - **Zero-copy**: the hive is memory-mapped and cells are borrowed in place
//! - **Bounded**: every cell offset is resolved through a checked lookup;
//!   subkey cycles and runaway nesting end the walk with an error
//! - **Big data**: segmented (`db`) values are reassembled on demand
//! - **Device properties**: type codes under `Properties` and
//!   `DriverPackages` keys are remapped before rendering
//!
//! ## Layers
//!
//! 1. **Hive** ([`hive`], [`header`], [`hbin`]): base block, first bin and
//!    the cell resolver
//! 2. **Cells** ([`key`], [`value`], [`subkey_list`], [`bigdata`]): typed
//!    views over `nk`, `vk`, `lf`/`lh`/`li`/`ri` and `db` cells
//! 3. **Decoding** ([`name`], [`value_type`], [`data`], [`render`],
//!    [`timestamp`]): names, effective types, value bytes and their text
//! 4. **Walk** ([`walker`]): depth-first traversal writing lines
//!
//! ## Output
//!
//! ```text
//! /ROOT/Software/Vendor/Name [1:12] = Hello
//! /ROOT/Software/Vendor/Count [4:4] = 0x2A (42)
//! /ROOT/Software/Empty
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use regdump::{dump_to_string, DumpOptions, Hive, TimeBasis};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hive = Hive::open("SYSTEM")?;
//! let options = DumpOptions::default().with_time_basis(TimeBasis::Utc);
//!
//! for line in dump_to_string(&hive, &options)?.lines() {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bigdata;
pub mod cell;
pub mod data;
pub mod error;
pub mod hbin;
pub mod header;
pub mod hive;
pub mod key;
pub mod name;
pub mod options;
pub mod render;
pub mod subkey_list;
pub mod timestamp;
pub mod utils;
pub mod value;
pub mod value_type;
pub mod walker;

// Python bindings (only compiled when python feature is enabled)
#[cfg(feature = "python")]
pub mod python;

pub use cell::{CellType, DevPropType, KeyNodeFlags, ValueType};
pub use error::{RegistryError, Result};
pub use header::BaseBlock;
pub use hive::Hive;
pub use key::KeyNode;
pub use options::{DumpOptions, TimestampMode, DEFAULT_MAX_DEPTH};
pub use render::RenderOptions;
pub use subkey_list::{SubkeyList, SubkeyListType};
pub use timestamp::TimeBasis;
pub use value::ValueKey;
pub use value_type::{ActiveScopes, Scope, ScopeContext};
pub use walker::{dump, dump_to_string, WalkStats, Walker};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
