/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Stores an opaque engine value of a certain size, with very restricted operations.
///
/// Note: due to `align(4)` / `align(8)` and not `packed` repr, this type may be bigger than `N` bytes
/// (which is fine, since the engine just needs to read/write those `N` bytes reliably).
#[cfg_attr(target_pointer_width = "32", repr(C, align(4)))]
#[cfg_attr(target_pointer_width = "64", repr(C, align(8)))]
#[derive(Copy, Clone)]
pub struct Opaque<const N: usize> {
    storage: [u8; N],
    marker: std::marker::PhantomData<*const u8>, // disable Send/Sync
}

impl<const N: usize> Opaque<N> {
    /// All-zero value; only meaningful as a placeholder before the engine writes into it.
    pub const fn zeroed() -> Self {
        Self {
            storage: [0; N],
            marker: std::marker::PhantomData,
        }
    }
}

// Sizes taken from `builtin_class_sizes` in the engine's API description. Strings, string names and arrays are
// a single pointer; variants hold up to 4 reals plus the type tag.

/// Storage of `String`.
pub type OpaqueString = Opaque<{ std::mem::size_of::<usize>() }>;

/// Storage of `StringName`.
pub type OpaqueStringName = Opaque<{ std::mem::size_of::<usize>() }>;

/// Storage of `Array`.
pub type OpaqueArray = Opaque<{ std::mem::size_of::<usize>() }>;

/// Storage of `Variant`.
#[cfg(not(feature = "double-precision"))]
pub type OpaqueVariant = Opaque<24>;

/// Storage of `Variant`.
#[cfg(feature = "double-precision")]
pub type OpaqueVariant = Opaque<40>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_layout() {
        assert_eq!(std::mem::size_of::<OpaqueString>(), std::mem::size_of::<*const u8>());
        assert_eq!(std::mem::align_of::<OpaqueVariant>(), std::mem::align_of::<usize>());
        assert!(std::mem::size_of::<OpaqueVariant>() >= 24);
    }
}
