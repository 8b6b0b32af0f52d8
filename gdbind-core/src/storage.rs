/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Heap cell holding a user instance next to its engine object.
//!
//! The same pointer serves as the engine's class instance pointer and as this library's instance binding on the
//! object, so it can be found from either side.

use std::cell::{Cell, RefCell};
use std::ffi::c_void;

use crate::obj::{Base, GdMut, GdRef, GodotClass};
use crate::sys;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Lifecycle {
    Alive,

    /// The engine invoked the free callback; the storage is being dropped.
    Destroying,
}

pub struct InstanceStorage<T: GodotClass> {
    user_instance: RefCell<T>,
    base: Base<T::Base>,
    lifecycle: Cell<Lifecycle>,

    /// Mirror of the engine's reference count, for ref-counted user classes.
    ref_count: Cell<u32>,
}

impl<T: GodotClass> InstanceStorage<T> {
    pub fn construct(user_instance: T, base: Base<T::Base>) -> Self {
        let storage = Self {
            user_instance: RefCell::new(user_instance),
            base,
            lifecycle: Cell::new(Lifecycle::Alive),
            ref_count: Cell::new(1),
        };

        sys::out!("    Storage::construct   {}", storage.debug_info());
        storage
    }

    pub(crate) fn on_inc_ref(&self) {
        self.ref_count.set(self.ref_count.get() + 1);
        sys::out!("    Storage::on_inc_ref  {} rc={}", self.debug_info(), self.ref_count.get());
    }

    pub(crate) fn on_dec_ref(&self) {
        self.ref_count.set(self.ref_count.get().saturating_sub(1));
        sys::out!("  | Storage::on_dec_ref  {} rc={}", self.debug_info(), self.ref_count.get());
    }

    /// Whether a `bind()` or `bind_mut()` guard is alive.
    pub fn is_bound(&self) -> bool {
        // A shared borrow would succeed next to other shared borrows.
        self.user_instance.try_borrow_mut().is_err()
    }

    /// # Panics
    /// If a `bind_mut()` guard is alive.
    pub fn get(&self) -> GdRef<'_, T> {
        match self.user_instance.try_borrow() {
            Ok(guard) => GdRef::from_guard(guard),
            Err(_) => panic!(
                "bind() on {} failed: instance is already bound mutably.\n  \
                Check for a live bind_mut() guard, possibly up the call stack when the engine calls back into Rust.",
                self.debug_info()
            ),
        }
    }

    /// # Panics
    /// If any `bind()` or `bind_mut()` guard is alive.
    pub fn get_mut(&self) -> GdMut<'_, T> {
        match self.user_instance.try_borrow_mut() {
            Ok(guard) => GdMut::from_guard(guard),
            Err(_) => panic!(
                "bind_mut() on {} failed: instance is already bound.\n  \
                Check for a live bind() or bind_mut() guard, possibly up the call stack when the engine calls back into Rust.",
                self.debug_info()
            ),
        }
    }

    /// Class name and instance ID, for diagnostics.
    pub fn debug_info(&self) -> String {
        let id = self.base.instance_id();
        match self.lifecycle.get() {
            Lifecycle::Alive => format!("{} (#{id})", T::class_name()),
            Lifecycle::Destroying => format!("{} (#{id}, being destroyed)", T::class_name()),
        }
    }

    #[must_use]
    pub fn into_raw(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    pub fn mark_destroyed_by_godot(&self) {
        sys::out!("    Storage::destroyed   {}", self.debug_info());
        self.lifecycle.set(Lifecycle::Destroying);
    }
}

impl<T: GodotClass> Drop for InstanceStorage<T> {
    fn drop(&mut self) {
        sys::out!("    Storage::drop        {} rc={}", self.debug_info(), self.ref_count.get());
    }
}

/// Reinterprets an instance pointer handed out by the engine.
///
/// # Safety
/// `instance_ptr` must come from [`InstanceStorage::into_raw`] for the same `T`, and the storage must outlive `'u`.
pub unsafe fn as_storage<'u, T: GodotClass>(
    instance_ptr: sys::GDExtensionClassInstancePtr,
) -> &'u InstanceStorage<T> {
    &*instance_ptr.cast::<InstanceStorage<T>>()
}

/// Drops the storage behind `instance_ptr`, and with it the user instance.
///
/// # Safety
/// Same as [`as_storage`]; additionally, this must be the last use of `instance_ptr`.
///
/// # Panics
/// If the instance is still bound. The storage is leaked in that case.
pub unsafe fn destroy_storage<T: GodotClass>(instance_ptr: sys::GDExtensionClassInstancePtr) {
    let raw = instance_ptr.cast::<InstanceStorage<T>>();
    let storage = &*raw;

    assert!(
        !storage.is_bound(),
        "object {} was freed while a bind() or bind_mut() guard is active",
        storage.debug_info()
    );

    storage.mark_destroyed_by_godot();
    drop(Box::from_raw(raw));
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Instance binding callbacks

/// Callbacks for `object_{get,set}_instance_binding`. The binding is created eagerly in the class constructor, so the
/// engine never needs to build one on demand.
pub fn nop_instance_callbacks() -> sys::GDExtensionInstanceBindingCallbacks {
    extern "C" fn create(_token: *mut c_void, _instance: *mut c_void) -> *mut c_void {
        std::ptr::null_mut()
    }

    extern "C" fn free(_token: *mut c_void, _instance: *mut c_void, _binding: *mut c_void) {}

    extern "C" fn reference(
        _token: *mut c_void,
        _binding: *mut c_void,
        _reference: sys::GDExtensionBool,
    ) -> sys::GDExtensionBool {
        sys::bool_to_sys(true)
    }

    sys::GDExtensionInstanceBindingCallbacks {
        create_callback: Some(create),
        free_callback: Some(free),
        reference_callback: Some(reference),
    }
}
