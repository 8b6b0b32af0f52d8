/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;
use std::mem::MaybeUninit;
use std::ptr;

use crate as sys;
use crate::{Inner, OpaqueStringName, PtrDestructorFn};

type StringNameNewFn = <sys::GDExtensionInterfaceStringNameNewWithUtf8CharsAndLen as Inner>::FnPtr;

/// Caches `StringName` instances for class and method names.
///
/// Names are created on first use and live until the cache is dropped, which happens when the binding is
/// deinitialized. The engine copies names it wants to keep, so pointers only need to be valid during a call.
pub struct StringCache {
    // Box is needed for element stability (new insertions don't move object; i.e. pointers to it remain valid).
    instances_by_str: HashMap<&'static str, Box<OpaqueStringName>>,
    string_name_new: StringNameNewFn,
    string_name_destroy: PtrDestructorFn,
}

impl StringCache {
    /// # Safety
    /// Both function pointers must stay callable for the lifetime of the cache.
    pub(crate) unsafe fn new(
        interface: &sys::GDExtensionInterface,
        builtin_lifecycle: &sys::BuiltinLifecycleTable,
    ) -> Self {
        Self {
            instances_by_str: HashMap::new(),
            string_name_new: interface
                .string_name_new_with_utf8_chars_and_len
                .unwrap_unchecked(),
            string_name_destroy: builtin_lifecycle.string_name.destroy,
        }
    }

    /// Get a pointer to a `StringName`. Reuses cached instances, only deallocates on destruction of this cache.
    pub fn fetch(&mut self, key: &'static str) -> sys::GDExtensionStringNamePtr {
        // Already cached.
        if let Some(opaque_box) = self.instances_by_str.get_mut(key) {
            return box_to_sname_ptr(opaque_box);
        }

        let mut sname = MaybeUninit::<OpaqueStringName>::uninit();
        let sname_ptr = sname.as_mut_ptr();

        // SAFETY: constructs the StringName in place; the function pointer was provided by the engine.
        let opaque = unsafe {
            (self.string_name_new)(
                sname_ptr as sys::GDExtensionUninitializedStringNamePtr,
                key.as_ptr() as *const std::ffi::c_char,
                key.len() as sys::GDExtensionInt,
            );
            sname.assume_init()
        };

        let mut opaque_box = Box::new(opaque);
        let sname_ptr = box_to_sname_ptr(&mut opaque_box);

        self.instances_by_str.insert(key, opaque_box);
        sname_ptr
    }

    pub fn len(&self) -> usize {
        self.instances_by_str.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances_by_str.is_empty()
    }
}

/// Destroy all string names.
impl Drop for StringCache {
    fn drop(&mut self) {
        for (_, mut opaque_box) in self.instances_by_str.drain() {
            let opaque_ptr = ptr::addr_of_mut!(*opaque_box);

            // SAFETY: each entry was constructed by the engine and is destroyed exactly once.
            unsafe { (self.string_name_destroy)(opaque_ptr as sys::GDExtensionTypePtr) };
        }
    }
}

fn box_to_sname_ptr(boxed: &mut Box<OpaqueStringName>) -> sys::GDExtensionStringNamePtr {
    let opaque_ptr = ptr::addr_of_mut!(**boxed);
    opaque_ptr as sys::GDExtensionStringNamePtr
}
