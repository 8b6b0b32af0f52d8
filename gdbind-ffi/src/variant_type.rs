/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate as sys;

/// Type of a value stored inside a `Variant`.
///
/// Like all engine enums, this is a newtype around the ordinal, so that values unknown to this crate
/// (e.g. from a newer engine) can still be represented.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VariantType {
    ord: i32,
}

macro_rules! variant_types {
    ( $( $(#[$attr:meta])* $NAME:ident = $ord:literal => $godot_name:literal, )* ) => {
        impl VariantType {
            $(
                $(#[$attr])*
                pub const $NAME: Self = Self { ord: $ord };
            )*

            /// Name of the constant, e.g. `"STRING_NAME"`.
            fn as_constant_str(self) -> Option<&'static str> {
                match self.ord {
                    $(
                        $(#[$attr])*
                        $ord => Some(stringify!($NAME)),
                    )*
                    _ => None,
                }
            }

            /// Name as shown in GDScript, e.g. `"StringName"`.
            pub fn godot_name(self) -> &'static str {
                match self.ord {
                    $(
                        $(#[$attr])*
                        $ord => $godot_name,
                    )*
                    _ => "<unknown>",
                }
            }
        }
    };
}

variant_types! {
    NIL = 0 => "Nil",
    BOOL = 1 => "bool",
    INT = 2 => "int",
    FLOAT = 3 => "float",
    STRING = 4 => "String",
    VECTOR2 = 5 => "Vector2",
    VECTOR2I = 6 => "Vector2i",
    RECT2 = 7 => "Rect2",
    RECT2I = 8 => "Rect2i",
    VECTOR3 = 9 => "Vector3",
    VECTOR3I = 10 => "Vector3i",
    TRANSFORM2D = 11 => "Transform2D",
    VECTOR4 = 12 => "Vector4",
    VECTOR4I = 13 => "Vector4i",
    PLANE = 14 => "Plane",
    QUATERNION = 15 => "Quaternion",
    AABB = 16 => "AABB",
    BASIS = 17 => "Basis",
    TRANSFORM3D = 18 => "Transform3D",
    PROJECTION = 19 => "Projection",
    COLOR = 20 => "Color",
    STRING_NAME = 21 => "StringName",
    NODE_PATH = 22 => "NodePath",
    RID = 23 => "RID",
    OBJECT = 24 => "Object",
    CALLABLE = 25 => "Callable",
    SIGNAL = 26 => "Signal",
    DICTIONARY = 27 => "Dictionary",
    ARRAY = 28 => "Array",
    PACKED_BYTE_ARRAY = 29 => "PackedByteArray",
    PACKED_INT32_ARRAY = 30 => "PackedInt32Array",
    PACKED_INT64_ARRAY = 31 => "PackedInt64Array",
    PACKED_FLOAT32_ARRAY = 32 => "PackedFloat32Array",
    PACKED_FLOAT64_ARRAY = 33 => "PackedFloat64Array",
    PACKED_STRING_ARRAY = 34 => "PackedStringArray",
    PACKED_VECTOR2_ARRAY = 35 => "PackedVector2Array",
    PACKED_VECTOR3_ARRAY = 36 => "PackedVector3Array",
    PACKED_COLOR_ARRAY = 37 => "PackedColorArray",
    #[cfg(since_api = "4.3")]
    PACKED_VECTOR4_ARRAY = 38 => "PackedVector4Array",
}

impl VariantType {
    /// Number of variant types known to the targeted API.
    #[cfg(before_api = "4.3")]
    pub const MAX: usize = 38;

    /// Number of variant types known to the targeted API.
    #[cfg(since_api = "4.3")]
    pub const MAX: usize = 39;

    pub const fn ord(self) -> i32 {
        self.ord
    }

    pub const fn from_ord(ord: i32) -> Self {
        Self { ord }
    }

    #[doc(hidden)]
    pub fn from_sys(ty: sys::GDExtensionVariantType) -> Self {
        Self { ord: ty as i32 }
    }

    #[doc(hidden)]
    pub fn sys(self) -> sys::GDExtensionVariantType {
        self.ord as sys::GDExtensionVariantType
    }

    /// Index into per-type tables; `None` for types outside the known range.
    pub(crate) fn table_index(self) -> Option<usize> {
        usize::try_from(self.ord).ok().filter(|&i| i < Self::MAX)
    }

    /// Iterates over all types with a table slot, `NIL` excluded.
    pub(crate) fn all_concrete() -> impl Iterator<Item = Self> {
        (1..Self::MAX as i32).map(Self::from_ord)
    }
}

impl fmt::Debug for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_constant_str() {
            Some(name) => f.write_str(name),
            None => write!(f, "VariantType({})", self.ord),
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.godot_name())
    }
}

#[cfg(test)]
mod tests {
    use super::VariantType;

    #[test]
    fn names_and_ordinals() {
        assert_eq!(VariantType::STRING_NAME.ord(), 21);
        assert_eq!(format!("{:?}", VariantType::STRING_NAME), "STRING_NAME");
        assert_eq!(VariantType::STRING_NAME.to_string(), "StringName");
        assert_eq!(format!("{:?}", VariantType::from_ord(1000)), "VariantType(1000)");
    }

    #[test]
    fn table_index_bounds() {
        assert_eq!(VariantType::NIL.table_index(), Some(0));
        assert_eq!(VariantType::from_ord(-1).table_index(), None);
        assert_eq!(VariantType::from_ord(VariantType::MAX as i32).table_index(), None);
        assert_eq!(VariantType::all_concrete().count(), VariantType::MAX - 1);
    }
}
