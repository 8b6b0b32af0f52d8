/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! `extern "C"` functions handed to the engine in the class creation info.
//!
//! None of them may unwind: user code runs inside [`handle_panic`], and failures become null returns or are logged.
#![allow(clippy::missing_safety_doc)]

use std::ffi::c_void;
use std::panic::AssertUnwindSafe;
use std::ptr;

use sys::{interface_fn, GodotFfi as _};

use crate::builtin::StringName;
use crate::obj::{cap, Base, GodotClass};
use crate::private::handle_panic;
use crate::storage::{as_storage, destroy_storage, nop_instance_callbacks, InstanceStorage};
use crate::sys;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Construction

pub unsafe extern "C" fn create<T: cap::GodotDefault>(_userdata: *mut c_void) -> sys::GDExtensionObjectPtr {
    create_custom(T::__godot_user_init).unwrap_or(ptr::null_mut())
}

/// Constructor of `#[class(no_init)]` classes. The engine requires one even for abstract classes.
pub unsafe extern "C" fn create_null<T>(_userdata: *mut c_void) -> sys::GDExtensionObjectPtr {
    ptr::null_mut()
}

/// Attaches a new user instance to an object that survived a hot reload.
pub unsafe extern "C" fn recreate<T: cap::GodotDefault>(
    _userdata: *mut c_void,
    object: sys::GDExtensionObjectPtr,
) -> sys::GDExtensionClassInstancePtr {
    attach_instance(T::__godot_user_init, object).unwrap_or(ptr::null_mut())
}

pub unsafe extern "C" fn recreate_null<T>(
    _userdata: *mut c_void,
    _object: sys::GDExtensionObjectPtr,
) -> sys::GDExtensionClassInstancePtr {
    ptr::null_mut()
}

/// Constructs an engine object of `T::Base` and attaches the instance built by `init`.
///
/// If `init` panics, the half-built object is destroyed and the panic message returned.
pub(crate) fn create_custom<T, F>(init: F) -> Result<sys::GDExtensionObjectPtr, String>
where
    T: GodotClass,
    F: FnOnce(Base<T::Base>) -> T,
{
    // SAFETY: the base class is an engine class or was registered before `T`.
    let object = unsafe { interface_fn!(classdb_construct_object)(T::Base::class_name().string_sys()) };

    if let Err(message) = attach_instance(init, object) {
        // SAFETY: nobody else has seen `object` yet.
        unsafe { interface_fn!(object_destroy)(object) };
        return Err(message);
    }

    Ok(object)
}

fn attach_instance<T, F>(init: F, object: sys::GDExtensionObjectPtr) -> Result<sys::GDExtensionClassInstancePtr, String>
where
    T: GodotClass,
    F: FnOnce(Base<T::Base>) -> T,
{
    let class_name = T::class_name();
    sys::out!("create callback: {class_name}");

    // SAFETY: `object` is a live instance of the base class.
    let base = unsafe { Base::from_sys(object) };

    // SAFETY: `base` stays alive, and `init` has not run yet.
    let user_base = unsafe { Base::from_base(&base) };
    let instance = handle_panic(
        || format!("{class_name}::init() panicked"),
        AssertUnwindSafe(|| init(user_base)),
    )?;

    let instance_ptr = InstanceStorage::<T>::construct(instance, base).into_raw().cast::<c_void>();
    let callbacks = nop_instance_callbacks();

    // SAFETY: the engine takes ownership of the storage and frees it through `free::<T>`.
    unsafe {
        interface_fn!(object_set_instance)(object, class_name.string_sys(), instance_ptr);
        interface_fn!(object_set_instance_binding)(
            object,
            sys::get_library().cast::<c_void>(),
            instance_ptr,
            &callbacks,
        );
    }

    Ok(instance_ptr)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Lifetime

pub unsafe extern "C" fn free<T: GodotClass>(_userdata: *mut c_void, instance: sys::GDExtensionClassInstancePtr) {
    // A panicking Drop impl must not unwind into the engine.
    let _ = handle_panic(
        || format!("dropping {} panicked", T::class_name()),
        || destroy_storage::<T>(instance),
    );
}

pub unsafe extern "C" fn reference<T: GodotClass>(instance: sys::GDExtensionClassInstancePtr) {
    as_storage::<T>(instance).on_inc_ref();
}

pub unsafe extern "C" fn unreference<T: GodotClass>(instance: sys::GDExtensionClassInstancePtr) {
    as_storage::<T>(instance).on_dec_ref();
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Overridden engine hooks

/// Resolves an engine callback name such as `_ready` to its trampoline, or null if not overridden.
pub unsafe extern "C" fn get_virtual<T: cap::ImplementsGodotVirtual>(
    _userdata: *mut c_void,
    name: sys::GDExtensionConstStringNamePtr,
) -> sys::GDExtensionClassCallVirtual {
    // Borrowed from the engine; must not be destructed here.
    let name = StringName::borrow_string_sys(name).to_string();
    T::__virtual_call(&name)
}

pub unsafe extern "C" fn to_string<T: cap::GodotToString>(
    instance: sys::GDExtensionClassInstancePtr,
    is_valid: *mut sys::GDExtensionBool,
    out_string: sys::GDExtensionStringPtr,
) {
    let storage = as_storage::<T>(instance);
    let result = handle_panic(
        || format!("{}::to_string() panicked", T::class_name()),
        AssertUnwindSafe(|| T::__godot_to_string(&storage.get())),
    );

    // `is_valid` arrives uninitialized. On failure the engine falls back to its own representation.
    *is_valid = sys::bool_to_sys(result.is_ok());
    if let Ok(string) = result {
        string.move_return_ptr(out_string.cast(), sys::PtrcallType::Standard);
    }
}

pub unsafe extern "C" fn on_notification<T: cap::GodotNotification>(
    instance: sys::GDExtensionClassInstancePtr,
    what: i32,
    _reversed: sys::GDExtensionBool,
) {
    let storage = as_storage::<T>(instance);
    let _ = handle_panic(
        || format!("{}::on_notification({what}) panicked", T::class_name()),
        AssertUnwindSafe(|| T::__godot_notification(&mut storage.get_mut(), what)),
    );
}
