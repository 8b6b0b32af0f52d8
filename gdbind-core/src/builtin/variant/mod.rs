/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use sys::{ffi_methods, interface_fn, GodotFfi};

use crate::builtin::{GString, StringName, VariantType};
use crate::meta::error::ConvertError;
use crate::meta::{impl_godot_as_self, FromGodot, ToGodot};
use crate::sys;

mod impls;

/// Godot variant type, able to store a variety of different types.
///
/// While Godot variants do not appear very frequently in Rust due to their lack of compile-time type-safety, they are
/// central to all sorts of dynamic APIs: varcall arguments, `Object::get`, array elements.
///
/// Every conversion into a variant copies the value; objects stored in a variant keep a strong reference when
/// RefCounted.
#[repr(C, align(8))]
pub struct Variant {
    opaque: sys::OpaqueVariant,
}

impl Variant {
    /// Create an empty variant (`null` value in GDScript).
    pub fn nil() -> Self {
        // SAFETY: `variant_new_nil` constructs a valid variant in place.
        unsafe {
            Self::new_with_var_uninit(|variant_ptr| {
                interface_fn!(variant_new_nil)(variant_ptr);
            })
        }
    }

    /// Create a variant holding a non-nil value.
    ///
    /// Equivalent to [`value.to_variant()`][ToGodot::to_variant], but consumes the argument.
    pub fn from<T: ToGodot>(value: T) -> Self {
        value.to_variant()
    }

    /// ⚠️ Convert to type `T`, panicking on failure.
    ///
    /// # Panics
    /// When this variant holds a different type.
    pub fn to<T: FromGodot>(&self) -> T {
        T::from_variant(self)
    }

    /// Convert to type `T`, returning `Err` on failure.
    pub fn try_to<T: FromGodot>(&self) -> Result<T, ConvertError> {
        T::try_from_variant(self)
    }

    /// Returns the type that is currently held by this variant.
    pub fn get_type(&self) -> VariantType {
        // SAFETY: `self` is a valid variant.
        let ty_sys = unsafe { interface_fn!(variant_get_type)(self.var_sys()) };
        VariantType::from_sys(ty_sys)
    }

    /// Checks whether the variant is empty (`null` value in GDScript).
    pub fn is_nil(&self) -> bool {
        self.get_type() == VariantType::NIL
    }

    /// Returns the string representation that `str()` in GDScript would produce.
    pub fn stringify(&self) -> GString {
        // SAFETY: `variant_stringify` constructs the result string in place.
        unsafe {
            GString::new_with_uninit(|string_ptr| {
                interface_fn!(variant_stringify)(self.var_sys(), string_ptr as sys::GDExtensionStringPtr);
            })
        }
    }

    /// Truthiness as in GDScript: `0`, empty strings, empty containers and `null` are `false`.
    pub fn booleanize(&self) -> bool {
        // SAFETY: `self` is a valid variant.
        let result = unsafe { interface_fn!(variant_booleanize)(self.var_sys()) };
        sys::u8_to_bool(result)
    }

    // ------------------------------------------------------------------------------------------------------------------------------------------
    // Low-level access

    fn from_opaque(opaque: sys::OpaqueVariant) -> Self {
        Self { opaque }
    }

    /// Constructs a variant in place.
    ///
    /// # Safety
    /// `init_fn` must fully initialize the variant behind the pointer.
    #[doc(hidden)]
    pub unsafe fn new_with_var_uninit(
        init_fn: impl FnOnce(sys::GDExtensionUninitializedVariantPtr),
    ) -> Self {
        let mut raw = std::mem::MaybeUninit::<sys::OpaqueVariant>::uninit();
        init_fn(raw.as_mut_ptr() as sys::GDExtensionUninitializedVariantPtr);

        Self::from_opaque(raw.assume_init())
    }

    /// Starts from `nil` and lets `init_fn` assign to it.
    ///
    /// # Safety
    /// `init_fn` must leave a valid variant behind the pointer.
    #[doc(hidden)]
    pub unsafe fn new_with_var_init(init_fn: impl FnOnce(sys::GDExtensionVariantPtr)) -> Self {
        let mut variant = Self::nil();
        init_fn(variant.var_sys_mut());
        variant
    }

    #[doc(hidden)]
    pub fn var_sys(&self) -> sys::GDExtensionConstVariantPtr {
        std::ptr::addr_of!(self.opaque) as sys::GDExtensionConstVariantPtr
    }

    #[doc(hidden)]
    pub fn var_sys_mut(&mut self) -> sys::GDExtensionVariantPtr {
        std::ptr::addr_of_mut!(self.opaque) as sys::GDExtensionVariantPtr
    }

    /// Reinterprets an engine-owned variant pointer as a reference.
    ///
    /// # Safety
    /// `ptr` must point to a live variant for the whole lifetime `'a`.
    #[doc(hidden)]
    pub unsafe fn borrow_var_sys<'a>(ptr: sys::GDExtensionConstVariantPtr) -> &'a Variant {
        sys::static_assert_eq_size!(Variant, sys::OpaqueVariant);
        &*(ptr as *const Variant)
    }
}

// SAFETY:
// - `from_arg_ptr` copies the borrowed variant via `variant_new_copy`.
// - `move_return_ptr` swaps into the initialized destination, whose old value is destroyed with `self`.
unsafe impl GodotFfi for Variant {
    fn variant_type() -> VariantType {
        VariantType::NIL
    }

    ffi_methods! { type sys::GDExtensionTypePtr = *mut Opaque; .. }

    unsafe fn new_with_init(init_fn: impl FnOnce(sys::GDExtensionTypePtr)) -> Self {
        // Ptrcalls returning `Variant` assign to the destination.
        Self::new_with_var_init(|ptr| init_fn(ptr as sys::GDExtensionTypePtr))
    }
}

impl_godot_as_self!(Variant);

impl Default for Variant {
    fn default() -> Self {
        Self::nil()
    }
}

impl Clone for Variant {
    fn clone(&self) -> Self {
        // SAFETY: `variant_new_copy` constructs a copy in place, taking a reference for reference-counted content.
        unsafe {
            Self::new_with_var_uninit(|variant_ptr| {
                interface_fn!(variant_new_copy)(variant_ptr, self.var_sys());
            })
        }
    }
}

impl Drop for Variant {
    fn drop(&mut self) {
        // SAFETY: `self` is valid and not used after this.
        unsafe {
            interface_fn!(variant_destroy)(self.var_sys_mut());
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stringify();
        write!(f, "{s}")
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get_type() {
            VariantType::NIL => write!(f, "null"),
            VariantType::STRING => {
                let string: GString = self.to();
                write!(f, "{string:?}")
            }
            VariantType::STRING_NAME => {
                let string_name: StringName = self.to();
                write!(f, "{string_name:?}")
            }
            // Other types have the same Display and Debug representation.
            _ => write!(f, "{self}"),
        }
    }
}
