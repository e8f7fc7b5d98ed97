//! Depth-first walk over the key tree, emitting one line per value or
//! empty key.

use crate::data::materialize;
use crate::error::{RegistryError, Result};
use crate::hive::Hive;
use crate::key::KeyNode;
use crate::name::append_name;
use crate::options::{DumpOptions, TimestampMode};
use crate::render::render_value;
use crate::subkey_list::SubkeyList;
use crate::timestamp::format_filetime;
use crate::value_type::{resolve_type, ScopeContext};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::Write;
use tracing::{debug, info, instrument};

/// Width of the `[type:size] ` column in hex mode; empty-key lines are
/// indented by it.
const HEX_COLUMN_WIDTH: usize = 20;

/// Counters collected during a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Key cells visited.
    pub keys: usize,
    /// Values rendered.
    pub values: usize,
    /// Lines written.
    pub lines: usize,
}

/// Streams the text dump of one hive to a writer.
pub struct Walker<'h, 'o, W: Write> {
    hive: &'h Hive,
    options: &'o DumpOptions,
    out: W,
    scopes: ScopeContext,
    visited: HashSet<u32>,
    stats: WalkStats,
}

impl<'h, 'o, W: Write> Walker<'h, 'o, W> {
    /// Creates a walker writing to `out`.
    pub fn new(hive: &'h Hive, options: &'o DumpOptions, out: W) -> Self {
        Self {
            hive,
            options,
            out,
            scopes: ScopeContext::new(),
            visited: HashSet::new(),
            stats: WalkStats::default(),
        }
    }

    /// Walks the whole tree from the root key.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed structure, cycle, over-deep nesting or
    /// write failure. Lines already written stay written.
    #[instrument(skip(self), fields(root = %format!("{:#x}", self.hive.root_offset())))]
    pub fn walk(&mut self) -> Result<WalkStats> {
        self.walk_key(self.hive.root_offset(), "", 0)?;
        self.out.flush()?;

        info!(
            keys = self.stats.keys,
            values = self.stats.values,
            lines = self.stats.lines,
            "Walk complete"
        );
        Ok(self.stats)
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn walk_key(&mut self, offset: u32, parent: &str, depth: usize) -> Result<()> {
        if depth >= self.options.max_depth {
            return Err(RegistryError::DepthExceeded {
                max_depth: self.options.max_depth,
                offset,
            });
        }
        if !self.visited.insert(offset) {
            return Err(RegistryError::CycleDetected { offset });
        }

        let hive = self.hive;
        let key = hive.key_node(offset)?;
        self.stats.keys += 1;

        let mut path = String::with_capacity(parent.len() + key.name.len() + 1);
        path.push_str(parent);
        path.push('/');
        append_name(&mut path, key.name, key.is_name_compressed());
        debug!(offset = %format!("{:#x}", offset), path = %path, "Walking key");

        if self.options.only_keys {
            let line = format!("{}{}", self.timestamp(&key, true), path);
            self.write_line(&line)?;
            return self.walk_children(&key, &path, depth).map(|_| ());
        }

        self.scopes.enter(key.name, depth);
        let result = self.emit_values_and_children(&key, &path, depth);
        self.scopes.leave(depth);
        let has_children = result?;

        if key.value_count == 0 && !has_children && !self.options.only_values {
            let mut line = self.timestamp(&key, false);
            if self.options.hex_type {
                line.push_str(&" ".repeat(HEX_COLUMN_WIDTH));
            }
            line.push_str(&path);
            self.write_line(&line)?;
        }

        Ok(())
    }

    fn emit_values_and_children(
        &mut self,
        key: &KeyNode<'h>,
        path: &str,
        depth: usize,
    ) -> Result<bool> {
        self.emit_values(key, path)?;
        self.walk_children(key, path, depth)
    }

    fn emit_values(&mut self, key: &KeyNode<'h>, path: &str) -> Result<()> {
        let hive = self.hive;
        let scopes = self.scopes.active();
        let render_options = self.options.render_options();

        for value_offset in hive.value_list(key.value_list_offset, key.value_count)? {
            let value = hive.value_key(value_offset)?;

            let mut value_path = String::with_capacity(path.len() + value.name.len() + 1);
            value_path.push_str(path);
            value_path.push('/');
            if value.is_default() {
                value_path.push('@');
            } else {
                append_name(&mut value_path, value.name, value.is_name_compressed());
            }

            let mut line = self.timestamp(key, false);
            let size = value.data_length();
            if self.options.hex_type {
                let _ = write!(line, "[{:08X}:{:08X}] {} = ", value.raw_type, size, value_path);
            } else {
                let _ = write!(line, "{} [{}:{}] = ", value_path, value.raw_type as i32, size);
            }

            let effective = resolve_type(value.raw_type, scopes);
            let data = materialize(hive, &value)?;
            render_value(&mut line, effective, value.raw_type, &data, scopes, render_options);
            drop(data);

            self.stats.values += 1;
            self.write_line(&line)?;
        }

        Ok(())
    }

    /// Walks the children of `key`; returns true if its subkey list has entries.
    fn walk_children(&mut self, key: &KeyNode<'h>, path: &str, depth: usize) -> Result<bool> {
        if !key.has_subkey_list() {
            return Ok(false);
        }

        let hive = self.hive;
        let list = hive.subkey_list(key.subkey_list_offset)?;
        let has_entries = !list.is_empty();

        match list {
            SubkeyList::Leaf(children) => {
                for child in children {
                    self.walk_key(child, path, depth + 1)?;
                }
            }
            SubkeyList::IndexRoot(sublists) => {
                for sublist_offset in sublists {
                    match hive.subkey_list(sublist_offset)? {
                        SubkeyList::Leaf(children) => {
                            for child in children {
                                self.walk_key(child, path, depth + 1)?;
                            }
                        }
                        SubkeyList::IndexRoot(_) => {
                            return Err(RegistryError::InvalidFormat(format!(
                                "Index root at {:#x} points at another index root at {:#x}",
                                key.subkey_list_offset, sublist_offset
                            )));
                        }
                    }
                }
            }
        }

        Ok(has_entries)
    }

    /// Timestamp prefix for a line about `key`; `always` forces one.
    fn timestamp(&self, key: &KeyNode<'h>, always: bool) -> String {
        if !always && self.options.timestamps == TimestampMode::Off {
            return String::new();
        }
        format_filetime(
            key.last_written,
            self.options.time_basis,
            self.options.full_time(),
            true,
        )
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        self.stats.lines += 1;
        Ok(())
    }
}

/// Dumps `hive` to `out`.
pub fn dump<W: Write>(hive: &Hive, options: &DumpOptions, out: W) -> Result<WalkStats> {
    Walker::new(hive, options, out).walk()
}

/// Dumps `hive` into a string, one line per entry.
pub fn dump_to_string(hive: &Hive, options: &DumpOptions) -> Result<String> {
    let mut buffer = Vec::new();
    dump(hive, options, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
