/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::{GString, StringName, VariantType};
use crate::meta::ClassName;
use crate::sys;

/// Describes a property in Godot.
///
/// Abstraction of the low-level `sys::GDExtensionPropertyInfo`.
///
/// Keeps the actual allocated values (the `sys` equivalent only keeps pointers, which fall out of scope).
#[derive(Clone, Debug)]
pub struct PropertyInfo {
    /// Which type this property has.
    ///
    /// For objects this is [`VariantType::OBJECT`] and `class_name` holds the actual class.
    /// For [`Variant`][crate::builtin::Variant], this is [`VariantType::NIL`].
    pub variant_type: VariantType,

    /// Which class this property is; [`ClassName::none()`] unless the variant type is `OBJECT`.
    pub class_name: ClassName,

    /// The name of this property in Godot.
    pub property_name: StringName,

    pub hint: PropertyHint,
    pub hint_string: GString,
    pub usage: PropertyUsageFlags,
}

impl PropertyInfo {
    /// Converts to the FFI type. Keep this object allocated while using that!
    pub fn property_sys(&self) -> sys::GDExtensionPropertyInfo {
        sys::GDExtensionPropertyInfo {
            type_: self.variant_type.sys(),
            name: sys::force_mut_ptr(self.property_name.string_sys()),
            class_name: sys::force_mut_ptr(self.class_name.string_sys()),
            hint: self.hint.ord(),
            hint_string: sys::force_mut_ptr(self.hint_string.string_sys()),
            usage: self.usage.ord(),
        }
    }
}

/// Hint for the editor how to present a property. Only the values used by gdbind are named.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PropertyHint {
    ord: u32,
}

impl PropertyHint {
    pub const NONE: Self = Self { ord: 0 };

    pub const fn ord(self) -> u32 {
        self.ord
    }
}

/// Bit flags describing how a property is used.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PropertyUsageFlags {
    ord: u32,
}

impl PropertyUsageFlags {
    pub const NONE: Self = Self { ord: 0 };
    pub const STORAGE: Self = Self { ord: 2 };
    pub const EDITOR: Self = Self { ord: 4 };
    pub const DEFAULT: Self = Self { ord: 6 };

    /// A `NIL` typed property accepts any variant.
    pub const NIL_IS_VARIANT: Self = Self { ord: 131072 };

    pub const fn ord(self) -> u32 {
        self.ord
    }

    pub const fn is_set(self, flag: Self) -> bool {
        self.ord & flag.ord == flag.ord
    }
}

impl std::ops::BitOr for PropertyUsageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            ord: self.ord | rhs.ord,
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Parameter or return type of a method, as registered with the engine.
#[derive(Clone, Debug)]
pub struct MethodParamOrReturnInfo {
    pub(crate) info: PropertyInfo,
    pub(crate) metadata: sys::GDExtensionClassMethodArgumentMetadata,
}

impl MethodParamOrReturnInfo {
    pub fn new(info: PropertyInfo, metadata: sys::GDExtensionClassMethodArgumentMetadata) -> Self {
        Self { info, metadata }
    }

    pub fn info(&self) -> &PropertyInfo {
        &self.info
    }

    pub fn metadata(&self) -> sys::GDExtensionClassMethodArgumentMetadata {
        self.metadata
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_flags() {
        assert_eq!(PropertyUsageFlags::STORAGE | PropertyUsageFlags::EDITOR, PropertyUsageFlags::DEFAULT);
        assert!(PropertyUsageFlags::DEFAULT.is_set(PropertyUsageFlags::EDITOR));
        assert!(!PropertyUsageFlags::DEFAULT.is_set(PropertyUsageFlags::NIL_IS_VARIANT));
        assert_eq!(PropertyUsageFlags::NIL_IS_VARIANT.ord(), 1 << 17);
    }
}
