/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ffi::c_char;
use std::fmt;

use sys::{ffi_methods, GodotFfi};

use crate::builtin::StringName;
use crate::meta::impl_godot_as_self;
use crate::sys;

/// Godot's reference counted string type.
///
/// Called `String` in the engine; named `GString` here to avoid confusion with Rust's `String`. Cloning is cheap
/// (copy-on-write in the engine), and the value is released on drop.
#[repr(C)]
pub struct GString {
    opaque: sys::OpaqueString,
}

impl GString {
    /// Construct a new empty `GString`.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_opaque(opaque: sys::OpaqueString) -> Self {
        Self { opaque }
    }

    /// Number of characters (Unicode code points), not bytes.
    pub fn len(&self) -> usize {
        self.to_string().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.utf8_bytes().is_empty()
    }

    #[doc(hidden)]
    pub fn string_sys(&self) -> sys::GDExtensionConstStringPtr {
        self.sys() as sys::GDExtensionConstStringPtr
    }

    /// UTF-8 encoded content, as copied out of the engine.
    fn utf8_bytes(&self) -> Vec<u8> {
        let to_utf8 = sys::interface_fn!(string_to_utf8_chars);

        // SAFETY: first call only measures (null buffer, max length 0), second call writes exactly `len` bytes.
        unsafe {
            let len = to_utf8(self.sys(), std::ptr::null_mut(), 0);
            assert!(len >= 0, "string_to_utf8_chars returned negative length {len}");

            let mut buf = vec![0u8; len as usize];
            to_utf8(self.sys(), buf.as_mut_ptr() as *mut c_char, len);
            buf
        }
    }
}

// SAFETY:
// - `move_return_ptr` swaps with the destination, whose old value is released when `self` drops.
// - `from_arg_ptr` clones the borrowed argument, so the engine's reference stays untouched.
unsafe impl GodotFfi for GString {
    fn variant_type() -> sys::VariantType {
        sys::VariantType::STRING
    }

    ffi_methods! { type sys::GDExtensionTypePtr = *mut Opaque; .. }

    unsafe fn new_with_init(init_fn: impl FnOnce(sys::GDExtensionTypePtr)) -> Self {
        // The engine assigns to the destination, so it must hold a valid (empty) string.
        let mut result = Self::default();
        init_fn(result.sys_mut());
        result
    }
}

impl Default for GString {
    fn default() -> Self {
        // SAFETY: constructor 0 of `String` takes no arguments and initializes the destination.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::builtin_lifecycle_api().string.construct_default;
                ctor(self_ptr, std::ptr::null());
            })
        }
    }
}

impl Clone for GString {
    fn clone(&self) -> Self {
        // SAFETY: copy constructor receives exactly one argument of type `String`.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::builtin_lifecycle_api().string.construct_copy;
                let args = [self.sys()];
                ctor(self_ptr, args.as_ptr());
            })
        }
    }
}

impl Drop for GString {
    fn drop(&mut self) {
        // SAFETY: `self` holds a valid string which is not used after this.
        unsafe {
            let destructor = sys::builtin_lifecycle_api().string.destroy;
            destructor(self.sys_mut());
        }
    }
}

impl PartialEq for GString {
    fn eq(&self, other: &Self) -> bool {
        self.utf8_bytes() == other.utf8_bytes()
    }
}

impl Eq for GString {}

impl_godot_as_self!(GString);

impl fmt::Display for GString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.utf8_bytes();
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

/// Uses literal syntax from GDScript: `"string"`.
impl fmt::Debug for GString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Conversion from/into Rust string types

impl From<&str> for GString {
    fn from(s: &str) -> Self {
        let bytes = s.as_bytes();

        // SAFETY: the engine copies `bytes.len()` bytes of UTF-8 into a fresh string.
        unsafe {
            Self::new_with_uninit(|string_ptr| {
                let ctor = sys::interface_fn!(string_new_with_utf8_chars_and_len);
                ctor(
                    string_ptr,
                    bytes.as_ptr() as *const c_char,
                    bytes.len() as sys::GDExtensionInt,
                );
            })
        }
    }
}

impl From<&String> for GString {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<String> for GString {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&GString> for String {
    fn from(string: &GString) -> Self {
        string.to_string()
    }
}

impl From<GString> for String {
    fn from(string: GString) -> Self {
        string.to_string()
    }
}

impl From<&StringName> for GString {
    fn from(name: &StringName) -> Self {
        // SAFETY: `String(StringName)` constructor with exactly one argument.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::builtin_lifecycle_api().string_from_string_name;
                let args = [name.sys()];
                ctor(self_ptr, args.as_ptr());
            })
        }
    }
}
