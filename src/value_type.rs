//! Effective value types and the subtrees that remap them.
//!
//! Values below a key named `Properties` may carry device property type
//! codes (`0xFFFF0000 | DEVPROP_TYPE_*`); values below `DriverPackages` keep
//! flags in the high word of an otherwise standard code. Both subtrees are
//! tracked per walk frame so sibling subtrees never affect each other.

use crate::cell::{DevPropType, ValueType, DEVPROP_TYPE_MASK};

/// A subtree that changes how stored type codes are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Below a `Properties` key.
    DeviceProperties,
    /// Below a `DriverPackages` key.
    DriverPackages,
}

impl Scope {
    /// Key name that opens this scope, compared byte for byte.
    pub fn trigger(&self) -> &'static [u8] {
        match self {
            Scope::DeviceProperties => b"Properties",
            Scope::DriverPackages => b"DriverPackages",
        }
    }

    /// The scope opened by a key with this raw name, if any.
    pub fn for_key_name(name: &[u8]) -> Option<Scope> {
        [Scope::DeviceProperties, Scope::DriverPackages]
            .into_iter()
            .find(|scope| scope.trigger() == name)
    }
}

/// Snapshot of which scopes apply to the values of the current key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveScopes {
    /// A `Properties` key is this key or one of its ancestors.
    pub device_properties: bool,
    /// A `DriverPackages` key is this key or one of its ancestors.
    pub driver_packages: bool,
}

/// Stack of scope activations, each tagged with the depth of the key that
/// opened it.
#[derive(Debug, Clone, Default)]
pub struct ScopeContext {
    activations: Vec<(Scope, usize)>,
}

impl ScopeContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records entry into a key at `depth`.
    ///
    /// Opens the key's scope unless that scope is already open further up,
    /// and returns the scope this frame opened.
    pub fn enter(&mut self, key_name: &[u8], depth: usize) -> Option<Scope> {
        let scope = Scope::for_key_name(key_name)?;
        if self.is_active(scope) {
            return None;
        }
        self.activations.push((scope, depth));
        Some(scope)
    }

    /// Closes every scope opened by the frame at `depth`.
    pub fn leave(&mut self, depth: usize) {
        while matches!(self.activations.last(), Some(&(_, d)) if d >= depth) {
            self.activations.pop();
        }
    }

    /// Returns true if `scope` is open.
    pub fn is_active(&self, scope: Scope) -> bool {
        self.activations.iter().any(|(s, _)| *s == scope)
    }

    /// Returns the currently open scopes.
    pub fn active(&self) -> ActiveScopes {
        ActiveScopes {
            device_properties: self.is_active(Scope::DeviceProperties),
            driver_packages: self.is_active(Scope::DriverPackages),
        }
    }
}

/// Maps a stored type code to the type used for rendering.
///
/// A device property code is only considered inside `Properties`, and only
/// when its high word is fully set; otherwise the `DriverPackages` mask
/// applies if that scope is open. Unmapped device codes pass through.
pub fn resolve_type(raw_type: u32, scopes: ActiveScopes) -> ValueType {
    if scopes.device_properties && raw_type & DEVPROP_TYPE_MASK == DEVPROP_TYPE_MASK {
        DevPropType::from_code(raw_type)
            .and_then(|devprop| devprop.standard_type())
            .unwrap_or(ValueType::from_u32(raw_type))
    } else if scopes.driver_packages {
        ValueType::from_u32(raw_type & 0xFFFF)
    } else {
        ValueType::from_u32(raw_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE: ActiveScopes = ActiveScopes {
        device_properties: true,
        driver_packages: false,
    };
    const DRIVER: ActiveScopes = ActiveScopes {
        device_properties: false,
        driver_packages: true,
    };

    #[test]
    fn test_device_property_remap() {
        assert_eq!(resolve_type(0xFFFF0006, DEVICE), ValueType::Dword);
        assert_eq!(resolve_type(0xFFFF0007, DEVICE), ValueType::Dword);
        assert_eq!(resolve_type(0xFFFF0008, DEVICE), ValueType::Qword);
        assert_eq!(resolve_type(0xFFFF0010, DEVICE), ValueType::Qword);
        assert_eq!(resolve_type(0xFFFF0012, DEVICE), ValueType::String);
        assert_eq!(resolve_type(0xFFFF0019, DEVICE), ValueType::String);
        assert_eq!(resolve_type(0xFFFF2012, DEVICE), ValueType::MultiString);
    }

    #[test]
    fn test_unmapped_device_codes_pass_through() {
        assert_eq!(resolve_type(0xFFFF0011, DEVICE), ValueType::Unknown(0xFFFF0011));
        assert_eq!(resolve_type(0xFFFF0004, DEVICE), ValueType::Unknown(0xFFFF0004));
        assert_eq!(resolve_type(0xFFFF0006, ActiveScopes::default()), ValueType::Unknown(0xFFFF0006));
    }

    #[test]
    fn test_driver_package_mask() {
        assert_eq!(resolve_type(0x0001_0001, DRIVER), ValueType::String);
        assert_eq!(resolve_type(0x0001_0001, ActiveScopes::default()), ValueType::Unknown(0x0001_0001));
    }

    #[test]
    fn test_device_scope_takes_precedence() {
        let both = ActiveScopes {
            device_properties: true,
            driver_packages: true,
        };
        assert_eq!(resolve_type(0xFFFF0007, both), ValueType::Dword);
        assert_eq!(resolve_type(0xFFFF0011, both), ValueType::Unknown(0xFFFF0011));
        // Without the full high word the driver mask still applies.
        assert_eq!(resolve_type(0x0002_0004, both), ValueType::Dword);
    }

    #[test]
    fn test_scope_stack() {
        let mut ctx = ScopeContext::new();
        assert_eq!(ctx.enter(b"Enum", 1), None);
        assert_eq!(ctx.enter(b"Properties", 2), Some(Scope::DeviceProperties));
        // Nested key of the same name does not reopen the scope.
        assert_eq!(ctx.enter(b"Properties", 4), None);
        ctx.leave(4);
        assert!(ctx.active().device_properties);
        ctx.leave(2);
        assert_eq!(ctx.active(), ActiveScopes::default());
    }

    #[test]
    fn test_names_compared_exactly() {
        let mut ctx = ScopeContext::new();
        assert_eq!(ctx.enter(b"properties", 1), None);
        assert_eq!(ctx.enter(b"DriverPackage", 1), None);
        assert_eq!(ctx.enter(b"DriverPackages", 1), Some(Scope::DriverPackages));
        assert!(ctx.active().driver_packages);
    }
}
