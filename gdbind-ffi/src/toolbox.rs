/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Functions and macros that are not very specific to gdbind, but come in handy.

use crate as sys;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Macros

/// Verifies a condition at compile time.
#[macro_export]
macro_rules! static_assert {
    ($cond:expr) => {
        const _: () = assert!($cond);
    };
    ($cond:expr, $msg:literal) => {
        const _: () = assert!($cond, $msg);
    };
}

/// Verifies at compile time that two types `T` and `U` have the same size.
#[macro_export]
macro_rules! static_assert_eq_size {
    ($T:ty, $U:ty) => {
        $crate::static_assert!(std::mem::size_of::<$T>() == std::mem::size_of::<$U>());
    };
    ($T:ty, $U:ty, $msg:literal) => {
        $crate::static_assert!(std::mem::size_of::<$T>() == std::mem::size_of::<$U>(), $msg);
    };
}

/// Trace output, enabled with the `debug-log` feature.
#[cfg(feature = "debug-log")]
#[macro_export]
macro_rules! out {
    ()                          => (eprintln!());
    ($fmt:literal)              => (eprintln!($fmt));
    ($fmt:literal, $($arg:tt)*) => (eprintln!($fmt, $($arg)*));
}

/// Trace output, enabled with the `debug-log` feature.
#[cfg(not(feature = "debug-log"))]
#[macro_export]
macro_rules! out {
    ()                          => ({});
    ($fmt:literal)              => ({ use std::io::{sink, Write}; let _ = write!(sink(), $fmt); });
    ($fmt:literal, $($arg:tt)*) => ({ use std::io::{sink, Write}; let _ = write!(sink(), $fmt, $($arg)*); });
}

/// Extract a function pointer from its `Option` and convert it to the (dereferenced) target type.
///
/// ```ignore
///  let get_godot_version = get_proc_address(sys::c_str(b"get_godot_version\0"));
///  let get_godot_version = sys::cast_fn_ptr!(get_godot_version as sys::GDExtensionInterfaceGetGodotVersion);
/// ```
#[macro_export]
macro_rules! cast_fn_ptr {
    ($option:ident as $ToType:ty) => {{
        let ptr = $option.expect("null function pointer");
        std::mem::transmute::<unsafe extern "C" fn(), <$ToType as $crate::Inner>::FnPtr>(ptr)
    }};
}

/// Makes sure that Godot is running, or panics. Debug mode only!
macro_rules! debug_assert_godot {
    ($expr:expr) => {
        debug_assert!(
            $expr,
            "Godot engine not available; make sure you are not calling it from unit/doc tests"
        );
    };
}

pub(crate) use debug_assert_godot;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Utility functions

/// Casts away `const`, for FFI structs whose fields are declared `*mut` but only read by the engine.
pub fn force_mut_ptr<T>(ptr: *const T) -> *mut T {
    ptr as *mut T
}

/// Returns a C `const char*` for a null-terminated byte string.
#[inline]
pub fn c_str(s: &[u8]) -> *const std::ffi::c_char {
    // Ensure null-terminated
    debug_assert!(!s.is_empty() && s[s.len() - 1] == 0);

    s.as_ptr() as *const std::ffi::c_char
}

/// Returns a C `const char*` for a string that was checked to be null-terminated.
///
/// Used for `file!()` and other literals, which are extended with `\0` via `concat!`.
#[inline]
pub fn c_str_from_str(s: &str) -> *const std::ffi::c_char {
    c_str(s.as_bytes())
}

/// Converts a Godot boolean to a Rust one.
#[inline]
pub fn u8_to_bool(u: sys::GDExtensionBool) -> bool {
    match u {
        0 => false,
        1 => true,
        _ => panic!("GDExtensionBool must be 0 or 1, got {u}"),
    }
}

/// Converts a Rust boolean to a Godot one.
#[inline]
pub const fn bool_to_sys(value: bool) -> sys::GDExtensionBool {
    value as sys::GDExtensionBool
}

/// Reads the human-readable version string from the engine's version struct.
pub fn read_version_string(version: &sys::GDExtensionGodotVersion) -> String {
    let char_ptr = version.string;

    // SAFETY: `version.string` points to a null-terminated string owned by the engine.
    let c_str = unsafe { std::ffi::CStr::from_ptr(char_ptr) };

    let full = String::from_utf8_lossy(c_str.to_bytes());
    full.strip_prefix("Godot Engine ").unwrap_or(&full).to_string()
}

/// Error value that signals "no error" to the engine, used as the initial state before a varcall.
#[doc(hidden)]
#[inline]
pub fn default_call_error() -> sys::GDExtensionCallError {
    sys::GDExtensionCallError {
        error: sys::GDEXTENSION_CALL_OK,
        argument: -1,
        expected: -1,
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Private helpers

/// Metafunction to extract inner function pointer types from all the bindgen `Option<F>` type names.
///
/// Needed for `cast_fn_ptr` macro and for the function types stored in tables.
#[doc(hidden)]
pub trait Inner: Sized {
    type FnPtr: Sized;

    fn extract(self, error_msg: &str) -> Self::FnPtr;
}

impl<T> Inner for Option<T> {
    type FnPtr = T;

    fn extract(self, error_msg: &str) -> Self::FnPtr {
        self.expect(error_msg)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_conversions() {
        assert!(u8_to_bool(bool_to_sys(true)));
        assert!(!u8_to_bool(bool_to_sys(false)));
    }

    #[test]
    #[should_panic(expected = "must be 0 or 1")]
    fn invalid_sys_bool() {
        u8_to_bool(2);
    }

    #[test]
    fn c_str_keeps_address() {
        let bytes = b"method\0";
        assert_eq!(c_str(bytes) as *const u8, bytes.as_ptr());
    }
}
