/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Lookup of engine function pointers by name and hash, cached per call site.
//!
//! Every engine method is reached through a _method bind_: a pointer obtained from the class DB by class name, method
//! name and a hash of the signature. Utility functions and builtin methods follow the same scheme. Lookups are done
//! lazily, the first time a call site runs, and stored in a static cell next to it.

use std::ffi::c_void;
use std::fmt;
use std::sync::atomic::{AtomicPtr, AtomicU32, Ordering};

use crate as sys;
use crate::{Inner, VariantType};

pub type UtilityFunctionBind = <sys::GDExtensionPtrUtilityFunction as Inner>::FnPtr;
pub type BuiltinMethodBind = <sys::GDExtensionPtrBuiltInMethod as Inner>::FnPtr;

/// Identifies an engine function that could not be loaded.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MethodBindError {
    pub kind: MethodBindKind,
    pub class_name: &'static str,
    pub method_name: &'static str,
    pub hash: i64,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MethodBindKind {
    ClassMethod,
    BuiltinMethod,
    UtilityFunction,
}

impl fmt::Display for MethodBindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            kind,
            class_name,
            method_name,
            hash,
        } = self;

        let what = match kind {
            MethodBindKind::ClassMethod => "class method",
            MethodBindKind::BuiltinMethod => "builtin method",
            MethodBindKind::UtilityFunction => "utility function",
        };

        if class_name.is_empty() {
            write!(f, "failed to load {what} {method_name} (hash {hash})")
        } else {
            write!(f, "failed to load {what} {class_name}::{method_name} (hash {hash})")
        }?;

        write!(f, "; make sure gdbind and Godot are compatible")
    }
}

impl std::error::Error for MethodBindError {}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Cells

/// Lazily loaded function pointer, stored in a `static` next to its call site.
///
/// The cell remembers the binding generation it was loaded in. After the library was deinitialized and initialized
/// again (hot reload), the pointer is loaded anew.
pub struct FnPtrCell {
    ptr: AtomicPtr<c_void>,
    generation: AtomicU32,
}

impl FnPtrCell {
    #[allow(clippy::new_without_default)] // must be const for statics
    pub const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(std::ptr::null_mut()),
            generation: AtomicU32::new(0),
        }
    }

    /// Returns the cached pointer, or runs `load` and caches a non-null result.
    fn get_or_load<E>(
        &self,
        load: impl FnOnce() -> Result<*mut c_void, E>,
    ) -> Result<*mut c_void, E> {
        let current = sys::binding_generation();

        if self.generation.load(Ordering::Acquire) == current {
            let ptr = self.ptr.load(Ordering::Acquire);
            if !ptr.is_null() {
                return Ok(ptr);
            }
        }

        let ptr = load()?;
        self.ptr.store(ptr, Ordering::Release);
        self.generation.store(current, Ordering::Release);
        Ok(ptr)
    }

    /// Method bind of an engine class method.
    pub fn class_method(
        &self,
        class_name: &'static str,
        method_name: &'static str,
        hash: i64,
    ) -> Result<sys::GDExtensionMethodBindPtr, MethodBindError> {
        self.get_or_load(|| {
            load_class_method(class_name, method_name, hash).map(|bind| bind as *mut c_void)
        })
        .map(|ptr| ptr as sys::GDExtensionMethodBindPtr)
    }

    /// Pointer to a global utility function such as `print`.
    pub fn utility_function(
        &self,
        function_name: &'static str,
        hash: i64,
    ) -> Result<UtilityFunctionBind, MethodBindError> {
        let ptr = self.get_or_load(|| {
            load_utility_function(function_name, hash).map(|f| f as *mut c_void)
        })?;

        // SAFETY: the pointer was stored from a `UtilityFunctionBind` above.
        Ok(unsafe { std::mem::transmute::<*mut c_void, UtilityFunctionBind>(ptr) })
    }

    /// Pointer to a method of a builtin type, such as `Array::size`.
    pub fn builtin_method(
        &self,
        variant_type: VariantType,
        method_name: &'static str,
        hash: i64,
    ) -> Result<BuiltinMethodBind, MethodBindError> {
        let ptr = self.get_or_load(|| {
            load_builtin_method(variant_type, method_name, hash).map(|f| f as *mut c_void)
        })?;

        // SAFETY: the pointer was stored from a `BuiltinMethodBind` above.
        Ok(unsafe { std::mem::transmute::<*mut c_void, BuiltinMethodBind>(ptr) })
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Loaders

pub fn load_class_method(
    class_name: &'static str,
    method_name: &'static str,
    hash: i64,
) -> Result<sys::GDExtensionMethodBindPtr, MethodBindError> {
    sys::out!("Load class method {class_name}::{method_name} (hash {hash})...");

    let get_method_bind = sys::interface_fn!(classdb_get_method_bind);

    // SAFETY: function pointers provided by Godot. We have no way to validate them.
    let method = sys::with_string_cache(|cache| {
        let class_sname = cache.fetch(class_name);
        let method_sname = cache.fetch(method_name);
        unsafe { get_method_bind(class_sname, method_sname, hash) }
    });

    if method.is_null() {
        Err(MethodBindError {
            kind: MethodBindKind::ClassMethod,
            class_name,
            method_name,
            hash,
        })
    } else {
        Ok(method)
    }
}

pub fn load_utility_function(
    function_name: &'static str,
    hash: i64,
) -> Result<UtilityFunctionBind, MethodBindError> {
    let get_utility_fn = sys::interface_fn!(variant_get_ptr_utility_function);

    // SAFETY: see above.
    let utility_fn = sys::with_string_cache(|cache| unsafe {
        get_utility_fn(cache.fetch(function_name), hash)
    });

    utility_fn.ok_or(MethodBindError {
        kind: MethodBindKind::UtilityFunction,
        class_name: "",
        method_name: function_name,
        hash,
    })
}

pub fn load_builtin_method(
    variant_type: VariantType,
    method_name: &'static str,
    hash: i64,
) -> Result<BuiltinMethodBind, MethodBindError> {
    let get_builtin_method = sys::interface_fn!(variant_get_ptr_builtin_method);

    // SAFETY: see above.
    let method = sys::with_string_cache(|cache| unsafe {
        get_builtin_method(variant_type.sys(), cache.fetch(method_name), hash)
    });

    method.ok_or(MethodBindError {
        kind: MethodBindKind::BuiltinMethod,
        class_name: variant_type.godot_name(),
        method_name,
        hash,
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_names_the_method() {
        let err = MethodBindError {
            kind: MethodBindKind::ClassMethod,
            class_name: "Noise",
            method_name: "get_noise_1d",
            hash: 3919130443,
        };

        let msg = err.to_string();
        assert!(msg.starts_with("failed to load class method Noise::get_noise_1d (hash 3919130443)"));
    }

    #[test]
    fn error_message_without_class() {
        let err = MethodBindError {
            kind: MethodBindKind::UtilityFunction,
            class_name: "",
            method_name: "print",
            hash: 2648703342,
        };

        assert!(err.to_string().starts_with("failed to load utility function print (hash"));
    }
}
