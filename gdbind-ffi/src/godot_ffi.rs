/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate as sys;

/// Types that can directly and fully represent some Godot type.
///
/// Adds methods to convert from and to Godot FFI pointers.
/// See [crate::ffi_methods] for ergonomic implementation.
///
/// # Safety
///
/// [`from_arg_ptr`](GodotFfi::from_arg_ptr) and [`move_return_ptr`](GodotFfi::move_return_ptr)
/// must properly initialize and clean up values given the [`PtrcallType`] provided by the caller.
#[doc(hidden)]
pub unsafe trait GodotFfi {
    fn variant_type() -> sys::VariantType;

    fn default_param_metadata() -> sys::GDExtensionClassMethodArgumentMetadata {
        sys::GDEXTENSION_METHOD_ARGUMENT_METADATA_NONE
    }

    /// Construct from Godot opaque pointer, taking over the value behind it.
    ///
    /// # Safety
    /// `ptr` must be a valid _type ptr_ encoding `Self`. No reference counts are touched: the caller is responsible
    /// for the pointee not being destroyed twice.
    unsafe fn new_from_sys(ptr: sys::GDExtensionConstTypePtr) -> Self;

    /// Construct uninitialized opaque data, then initialize it with `init_fn`.
    ///
    /// # Safety
    /// `init_fn` must be a function that correctly handles an uninitialized _type ptr_.
    unsafe fn new_with_uninit(init_fn: impl FnOnce(sys::GDExtensionUninitializedTypePtr)) -> Self;

    /// Like [`Self::new_with_uninit`], but the pointer passed to `init_fn` holds a valid default instance.
    ///
    /// Needed for engine functions that assign to their destination rather than constructing in place, such as
    /// ptrcall return slots of `String`, `StringName` and `Array`.
    ///
    /// # Safety
    /// `init_fn` must be a function that correctly handles an initialized _type ptr_.
    unsafe fn new_with_init(init_fn: impl FnOnce(sys::GDExtensionTypePtr)) -> Self
    where
        Self: Sized,
    {
        // Sound for POD types only; opaque types override this.
        Self::new_with_uninit(init_fn)
    }

    /// Return Godot opaque pointer, for an immutable operation.
    ///
    /// Note that this is a `*mut` pointer despite taking `&self` by shared-ref.
    /// This is because most of Godot's Rust API is not const-correct.
    fn sys(&self) -> sys::GDExtensionConstTypePtr;

    /// Return Godot opaque pointer, for a mutable operation.
    fn sys_mut(&mut self) -> sys::GDExtensionTypePtr;

    fn as_arg_ptr(&self) -> sys::GDExtensionConstTypePtr {
        self.sys()
    }

    /// Construct from a pointer to an argument in an incoming call.
    ///
    /// Arguments are borrowed from the engine, so reference-counted values take their own reference.
    ///
    /// # Safety
    /// `ptr` must encode `Self` according to the given `call_type`'s encoding of argument values.
    unsafe fn from_arg_ptr(ptr: sys::GDExtensionTypePtr, call_type: PtrcallType) -> Self;

    /// Move self into the return slot `dst`, dropping what is already in `dst`.
    ///
    /// # Safety
    /// `dst` must hold a valid value of type `Self`, encoded according to `call_type`'s encoding of return values.
    unsafe fn move_return_ptr(self, dst: sys::GDExtensionTypePtr, call_type: PtrcallType);
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Types that can represent null-values.
///
/// Used to blanket implement conversions over `Option<T>`.
pub trait GodotNullableFfi: Sized + GodotFfi {
    fn null() -> Self;

    fn is_null(&self) -> bool;

    fn flatten_option(opt: Option<Self>) -> Self {
        opt.unwrap_or_else(Self::null)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// An indication of what type of pointer call is being made.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PtrcallType {
    /// Standard pointer call.
    ///
    /// Every argument is passed in as a pointer to a value of that type, and the return value must be moved into
    /// the return pointer.
    #[default]
    Standard,

    /// Virtual pointer call.
    ///
    /// Behaves like [`PtrcallType::Standard`], except for objects. Objects that do not inherit from `RefCounted`
    /// are passed as `Object**`; objects that do are passed as `Ref<T>*` and returned as `Ref<T>`.
    ///
    /// A `Ref<T>*` is read with `ref_get_object` and written with `ref_set_object`.
    Virtual,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Macros implementing `GodotFfi` methods for a given pointer layout. See `ffi_methods!` doc.

#[macro_export]
#[doc(hidden)]
macro_rules! ffi_methods_one {
    // Sys pointer = address of the `opaque` field.
    (OpaquePtr; new_from_sys) => {
        unsafe fn new_from_sys(ptr: $crate::GDExtensionConstTypePtr) -> Self {
            let opaque = std::ptr::read(ptr as *const _);
            Self::from_opaque(opaque)
        }
    };
    (OpaquePtr; new_with_uninit) => {
        unsafe fn new_with_uninit(init: impl FnOnce($crate::GDExtensionUninitializedTypePtr)) -> Self {
            let mut raw = std::mem::MaybeUninit::uninit();
            init(raw.as_mut_ptr() as $crate::GDExtensionUninitializedTypePtr);

            Self::from_opaque(raw.assume_init())
        }
    };
    (OpaquePtr; sys) => {
        fn sys(&self) -> $crate::GDExtensionConstTypePtr {
            std::ptr::addr_of!(self.opaque) as $crate::GDExtensionConstTypePtr
        }

        fn sys_mut(&mut self) -> $crate::GDExtensionTypePtr {
            std::ptr::addr_of_mut!(self.opaque) as $crate::GDExtensionTypePtr
        }
    };
    (OpaquePtr; from_arg_ptr) => {
        unsafe fn from_arg_ptr(ptr: $crate::GDExtensionTypePtr, _call_type: $crate::PtrcallType) -> Self {
            // Borrowed from the engine: take our own reference, leave the engine's untouched.
            let borrowed = std::mem::ManuallyDrop::new(Self::new_from_sys(ptr as $crate::GDExtensionConstTypePtr));
            std::mem::ManuallyDrop::into_inner(borrowed.clone())
        }
    };
    (OpaquePtr; move_return_ptr) => {
        unsafe fn move_return_ptr(mut self, dst: $crate::GDExtensionTypePtr, _call_type: $crate::PtrcallType) {
            // Old value in `dst` ends up in `self` and is destroyed with it.
            std::ptr::swap(dst as *mut _, std::ptr::addr_of_mut!(self.opaque))
        }
    };

    // Sys pointer = address of `Self`.
    (SelfPtr; new_from_sys) => {
        unsafe fn new_from_sys(ptr: $crate::GDExtensionConstTypePtr) -> Self {
            *(ptr as *const Self)
        }
    };
    (SelfPtr; new_with_uninit) => {
        unsafe fn new_with_uninit(init: impl FnOnce($crate::GDExtensionUninitializedTypePtr)) -> Self {
            let mut raw = std::mem::MaybeUninit::<Self>::uninit();
            init(raw.as_mut_ptr() as $crate::GDExtensionUninitializedTypePtr);

            raw.assume_init()
        }
    };
    (SelfPtr; sys) => {
        fn sys(&self) -> $crate::GDExtensionConstTypePtr {
            self as *const Self as $crate::GDExtensionConstTypePtr
        }

        fn sys_mut(&mut self) -> $crate::GDExtensionTypePtr {
            self as *mut Self as $crate::GDExtensionTypePtr
        }
    };
    (SelfPtr; from_arg_ptr) => {
        unsafe fn from_arg_ptr(ptr: $crate::GDExtensionTypePtr, _call_type: $crate::PtrcallType) -> Self {
            *(ptr as *mut Self)
        }
    };
    (SelfPtr; move_return_ptr) => {
        unsafe fn move_return_ptr(self, dst: $crate::GDExtensionTypePtr, _call_type: $crate::PtrcallType) {
            *(dst as *mut Self) = self
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! ffi_methods_rest {
    ( // selected methods
        $Impl:ident; $( fn $sys_fn:ident; )*
    ) => {
        $( $crate::ffi_methods_one!($Impl; $sys_fn); )*
    };

    ( // all methods
        $Impl:ident; ..
    ) => {
        $crate::ffi_methods_one!($Impl; new_from_sys);
        $crate::ffi_methods_one!($Impl; new_with_uninit);
        $crate::ffi_methods_one!($Impl; sys);
        $crate::ffi_methods_one!($Impl; from_arg_ptr);
        $crate::ffi_methods_one!($Impl; move_return_ptr);
    };
}

/// Provides "sys" style methods for FFI and ptrcall integration with Godot.
///
/// The generated implementations follow one of two patterns:
///
/// * `*mut Opaque`<br>
///   For a type with an `opaque` field storing an engine value (e.g. `String`, `Array`).
///   The **address of** the `opaque` field is used as the sys pointer.
///   Expects a `from_opaque()` constructor and `Clone`, which must take a new engine-side reference.
///
/// * `*mut Self`<br>
///   For a type implemented with standard Rust fields that matches the engine layout bit by bit (e.g. `i64`,
///   `Vector2`). The address of `Self` is directly reinterpreted as the sys pointer.
///
/// Use `..` to implement all methods, or list them as `fn name;` to pick a subset and write the rest by hand.
///
/// ## Using `*mut Opaque`
///
/// Incoming arguments are borrowed: the value is read and cloned, leaving the engine's copy intact.
/// Returning a value swaps it with the content of the return pointer, then drops the previous content.
///
/// ## Using `*mut Self`
///
/// Turning pointer call arguments into a value is a dereference.
/// Returning a value from a pointer call is `*ret_ptr = value`.
#[macro_export]
macro_rules! ffi_methods {
    ( // Sys pointer = address of opaque
        type $Ptr:ty = *mut Opaque;
        $( $rest:tt )*
    ) => {
        $crate::ffi_methods_rest!(OpaquePtr; $($rest)*);
    };

    ( // Sys pointer = address of self
        type $Ptr:ty = *mut Self;
        $( $rest:tt )*
    ) => {
        $crate::ffi_methods_rest!(SelfPtr; $($rest)*);
    };
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Implementation for common types (needs to be this crate due to orphan rule)

mod scalars {
    use super::GodotFfi;
    use crate as sys;

    // SAFETY: `bool` is represented as `GDExtensionBool` (u8) in ptrcalls, which has the same layout.
    unsafe impl GodotFfi for bool {
        fn variant_type() -> sys::VariantType {
            sys::VariantType::BOOL
        }

        ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
    }

    // SAFETY: engine ints are 64-bit in ptrcalls.
    unsafe impl GodotFfi for i64 {
        fn variant_type() -> sys::VariantType {
            sys::VariantType::INT
        }

        fn default_param_metadata() -> sys::GDExtensionClassMethodArgumentMetadata {
            sys::GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_INT64
        }

        ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
    }

    // SAFETY: engine floats are 64-bit in ptrcalls, regardless of `real` precision.
    unsafe impl GodotFfi for f64 {
        fn variant_type() -> sys::VariantType {
            sys::VariantType::FLOAT
        }

        fn default_param_metadata() -> sys::GDExtensionClassMethodArgumentMetadata {
            sys::GDEXTENSION_METHOD_ARGUMENT_METADATA_REAL_IS_DOUBLE
        }

        ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
    }

    // SAFETY: no value is read from or written to any pointer.
    unsafe impl GodotFfi for () {
        fn variant_type() -> sys::VariantType {
            sys::VariantType::NIL
        }

        unsafe fn new_from_sys(_ptr: sys::GDExtensionConstTypePtr) -> Self {}

        unsafe fn new_with_uninit(init: impl FnOnce(sys::GDExtensionUninitializedTypePtr)) -> Self {
            // Void return: the engine ignores the return slot.
            init(std::ptr::null_mut());
        }

        fn sys(&self) -> sys::GDExtensionConstTypePtr {
            // ZST dummy pointer
            self as *const _ as sys::GDExtensionConstTypePtr
        }

        fn sys_mut(&mut self) -> sys::GDExtensionTypePtr {
            self as *mut _ as sys::GDExtensionTypePtr
        }

        unsafe fn from_arg_ptr(_ptr: sys::GDExtensionTypePtr, _call_type: super::PtrcallType) -> Self {}

        unsafe fn move_return_ptr(self, _dst: sys::GDExtensionTypePtr, _call_type: super::PtrcallType) {}
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_ptrcall_layout() {
        let mut slot: i64 = 0;
        let value: i64 = -42;

        unsafe {
            value.move_return_ptr(std::ptr::addr_of_mut!(slot) as sys::GDExtensionTypePtr, PtrcallType::Standard);
            assert_eq!(slot, -42);

            let read = i64::from_arg_ptr(std::ptr::addr_of_mut!(slot) as sys::GDExtensionTypePtr, PtrcallType::Virtual);
            assert_eq!(read, -42);
        }
    }

    #[test]
    fn float_is_written_in_place() {
        let value = unsafe {
            f64::new_with_uninit(|ptr| {
                *(ptr as *mut f64) = 2.5;
            })
        };

        assert_eq!(value, 2.5);
    }

    #[test]
    fn unit_still_runs_init() {
        let mut called = false;
        unsafe {
            <()>::new_with_uninit(|ptr| {
                assert!(ptr.is_null());
                called = true;
            })
        };

        assert!(called);
    }

    #[test]
    fn bool_sys_is_one_byte() {
        let flag = true;
        let ptr = flag.sys() as *const u8;

        assert_eq!(unsafe { *ptr }, 1);
    }
}
