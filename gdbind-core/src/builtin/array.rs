/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use sys::{ffi_methods, interface_fn, FnPtrCell, GodotFfi};

use crate::builtin::{Variant, VariantType};
use crate::meta::error::CallError;
use crate::meta::{impl_godot_as_self, CallContext, Signature, ToGodot};
use crate::sys;

/// Godot's untyped `Array` type.
///
/// Holds a list of [`Variant`] elements. Arrays have reference semantics: [`Clone`] produces a second handle to the
/// **same** array, not a copy of the elements. The array is released when the last handle is dropped.
#[repr(C)]
pub struct VariantArray {
    opaque: sys::OpaqueArray,
}

impl VariantArray {
    /// Constructs an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_opaque(opaque: sys::OpaqueArray) -> Self {
        Self { opaque }
    }

    /// Returns the number of elements in the array. Equivalent of `size()` in Godot.
    pub fn len(&self) -> usize {
        static SIZE: FnPtrCell = FnPtrCell::new();
        let method = builtin_method(&SIZE, "size", 3173160232);

        // SAFETY: `Array::size` takes no arguments and returns `int`.
        let len = unsafe {
            Signature::<(), i64>::out_builtin_ptrcall(
                method,
                "Array",
                "size",
                sys::force_mut_ptr(self.sys()),
                (),
            )
        };

        usize::try_from(len).unwrap_or_else(|_| panic!("array reports negative length {len}"))
    }

    /// Returns `true` if the array contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends an element to the end of the array. Equivalent of `push_back()` in Godot.
    pub fn push(&mut self, value: impl ToGodot) {
        static PUSH_BACK: FnPtrCell = FnPtrCell::new();
        let method = builtin_method(&PUSH_BACK, "push_back", 3316032543);

        // SAFETY: `Array::push_back` takes one `Variant` and returns nothing.
        unsafe {
            Signature::<(Variant,), ()>::out_builtin_ptrcall(
                method,
                "Array",
                "push_back",
                self.sys_mut(),
                (value.to_variant(),),
            )
        }
    }

    /// Returns a copy of the element at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<Variant> {
        if index >= self.len() {
            return None;
        }

        // SAFETY: index was bounds-checked; the engine returns a pointer into the array's storage.
        let element = unsafe {
            let element_ptr = interface_fn!(array_operator_index_const)(self.sys(), index as i64);
            Variant::borrow_var_sys(element_ptr as sys::GDExtensionConstVariantPtr).clone()
        };

        Some(element)
    }

    /// Iterates over copies of the elements.
    ///
    /// "Shared" because other handles to the same array may modify it during iteration; the iterator re-checks the
    /// length on each step and ends early rather than reading out of bounds.
    pub fn iter_shared(&self) -> Iter<'_> {
        Iter {
            array: self,
            next_idx: 0,
        }
    }
}

fn builtin_method(
    cell: &'static FnPtrCell,
    method_name: &'static str,
    hash: i64,
) -> sys::BuiltinMethodBind {
    cell.builtin_method(VariantType::ARRAY, method_name, hash)
        .unwrap_or_else(|err| {
            let call_ctx = CallContext::outbound("Array", method_name);
            panic!("{}", CallError::failed_method_bind(&call_ctx, err))
        })
}

// SAFETY: see `GString`; arrays are reference-counted in the same way.
unsafe impl GodotFfi for VariantArray {
    fn variant_type() -> VariantType {
        VariantType::ARRAY
    }

    ffi_methods! { type sys::GDExtensionTypePtr = *mut Opaque; .. }

    unsafe fn new_with_init(init_fn: impl FnOnce(sys::GDExtensionTypePtr)) -> Self {
        let mut result = Self::default();
        init_fn(result.sys_mut());
        result
    }
}

impl_godot_as_self!(VariantArray);

impl Default for VariantArray {
    fn default() -> Self {
        // SAFETY: constructor 0 of `Array` takes no arguments.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::builtin_lifecycle_api().array.construct_default;
                ctor(self_ptr, std::ptr::null());
            })
        }
    }
}

impl Clone for VariantArray {
    fn clone(&self) -> Self {
        // SAFETY: copy constructor with exactly one `Array` argument; shares the underlying storage.
        unsafe {
            Self::new_with_uninit(|self_ptr| {
                let ctor = sys::builtin_lifecycle_api().array.construct_copy;
                let args = [self.sys()];
                ctor(self_ptr, args.as_ptr());
            })
        }
    }
}

impl Drop for VariantArray {
    fn drop(&mut self) {
        // SAFETY: `self` is valid and not used after this.
        unsafe {
            let destructor = sys::builtin_lifecycle_api().array.destroy;
            destructor(self.sys_mut());
        }
    }
}

impl fmt::Debug for VariantArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter_shared()).finish()
    }
}

impl<T: ToGodot> FromIterator<T> for VariantArray {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Iterator over the elements of a [`VariantArray`], yielding copies.
pub struct Iter<'a> {
    array: &'a VariantArray,
    next_idx: usize,
}

impl Iterator for Iter<'_> {
    type Item = Variant;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.array.get(self.next_idx)?;
        self.next_idx += 1;
        Some(element)
    }
}
