/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ffi::c_char;
use std::fmt;

use sys::{ffi_methods, GodotFfi};

use crate::builtin::GString;
use crate::meta::impl_godot_as_self;
use crate::sys;

/// Interned string, used for class, method, signal and property names.
///
/// Two `StringName`s with the same content share the same engine storage, so comparisons are cheap on the engine side.
#[repr(C)]
pub struct StringName {
    opaque: sys::OpaqueStringName,
}

impl StringName {
    fn from_opaque(opaque: sys::OpaqueStringName) -> Self {
        Self { opaque }
    }

    /// Number of characters (Unicode code points).
    pub fn len(&self) -> usize {
        GString::from(self).len()
    }

    pub fn is_empty(&self) -> bool {
        GString::from(self).is_empty()
    }

    /// Pointer to the engine `StringName`, as expected by interface functions taking names.
    #[doc(hidden)]
    pub fn string_sys(&self) -> sys::GDExtensionConstStringNamePtr {
        self.sys()
    }

    /// Borrows a name owned by the engine, e.g. the method name passed to a virtual lookup.
    ///
    /// # Safety
    /// `ptr` must point to a live `StringName` for the whole lifetime `'a`.
    #[doc(hidden)]
    pub unsafe fn borrow_string_sys<'a>(ptr: sys::GDExtensionConstStringNamePtr) -> &'a StringName {
        sys::static_assert_eq_size!(StringName, sys::OpaqueStringName);
        &*(ptr as *const StringName)
    }
}

// SAFETY: see `GString`; reference-counted in the same way.
unsafe impl GodotFfi for StringName {
    fn variant_type() -> sys::VariantType {
        sys::VariantType::STRING_NAME
    }

    ffi_methods! { type sys::GDExtensionTypePtr = *mut Opaque; .. }

    unsafe fn new_with_init(init_fn: impl FnOnce(sys::GDExtensionTypePtr)) -> Self {
        let mut result = Self::default();
        init_fn(result.sys_mut());
        result
    }
}

impl Default for StringName {
    fn default() -> Self {
        // SAFETY: default constructor without arguments.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::builtin_lifecycle_api().string_name.construct_default;
                ctor(self_ptr, std::ptr::null());
            })
        }
    }
}

impl Clone for StringName {
    fn clone(&self) -> Self {
        // SAFETY: copy constructor with exactly one argument of type `StringName`.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::builtin_lifecycle_api().string_name.construct_copy;
                let args = [self.sys()];
                ctor(self_ptr, args.as_ptr());
            })
        }
    }
}

impl Drop for StringName {
    fn drop(&mut self) {
        // SAFETY: `self` is valid and not used after this.
        unsafe {
            let destructor = sys::builtin_lifecycle_api().string_name.destroy;
            destructor(self.sys_mut());
        }
    }
}

impl PartialEq for StringName {
    fn eq(&self, other: &Self) -> bool {
        GString::from(self) == GString::from(other)
    }
}

impl Eq for StringName {}

impl_godot_as_self!(StringName);

impl fmt::Display for StringName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&GString::from(self), f)
    }
}

/// Uses literal syntax from GDScript: `&"string_name"`.
impl fmt::Debug for StringName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&\"{self}\"")
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Conversions

impl From<&str> for StringName {
    fn from(s: &str) -> Self {
        let bytes = s.as_bytes();

        // SAFETY: the engine copies `bytes.len()` bytes of UTF-8 into a fresh name.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::interface_fn!(string_name_new_with_utf8_chars_and_len);
                ctor(
                    self_ptr,
                    bytes.as_ptr() as *const c_char,
                    bytes.len() as sys::GDExtensionInt,
                );
            })
        }
    }
}

impl From<&String> for StringName {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&GString> for StringName {
    fn from(string: &GString) -> Self {
        // SAFETY: `StringName(String)` constructor with exactly one argument.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::builtin_lifecycle_api().string_name_from_string;
                let args = [string.sys()];
                ctor(self_ptr, args.as_ptr());
            })
        }
    }
}

impl From<&StringName> for String {
    fn from(name: &StringName) -> Self {
        name.to_string()
    }
}
