/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::{GString, StringName, Variant, VariantType};
use crate::meta::error::ConvertError;
use crate::meta::{ClassName, GodotConvert, MethodParamOrReturnInfo, PropertyHint, PropertyInfo, PropertyUsageFlags};
use crate::sys::{self, GodotFfi, GodotNullableFfi};

pub(crate) mod sealed {
    /// Implemented next to every `GodotType` impl; user crates cannot name it.
    pub trait Sealed {}
}

/// FFI representation that can be stored in and read from a [`Variant`].
#[doc(hidden)]
pub trait GodotFfiVariant: Sized + GodotFfi {
    fn ffi_to_variant(&self) -> Variant;
    fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError>;
}

/// Rust type with a native engine counterpart: `bool`, the integers and floats, the builtins, `Gd<T>` and `Variant`.
///
/// Other types travel through one of these by implementing [`GodotConvert`] with it as `Via`. The set is closed.
pub trait GodotType: GodotConvert<Via = Self> + sealed::Sealed + Sized + 'static {
    /// Layout used in ptrcalls. Narrow integers and `f32` widen to the engine's 64-bit types.
    #[doc(hidden)]
    type Ffi: GodotFfiVariant + 'static;

    #[doc(hidden)]
    fn to_ffi(&self) -> Self::Ffi;

    #[doc(hidden)]
    fn into_ffi(self) -> Self::Ffi;

    #[doc(hidden)]
    fn try_from_ffi(ffi: Self::Ffi) -> Result<Self, ConvertError>;

    /// Tells the engine the real width behind `int`/`float` parameters.
    #[doc(hidden)]
    fn param_metadata() -> sys::GDExtensionClassMethodArgumentMetadata {
        Self::Ffi::default_param_metadata()
    }

    /// Class of object types; empty for everything else.
    #[doc(hidden)]
    fn class_name() -> ClassName {
        ClassName::none()
    }

    #[doc(hidden)]
    fn property_info(property_name: &str) -> PropertyInfo {
        PropertyInfo {
            variant_type: Self::Ffi::variant_type(),
            class_name: Self::class_name(),
            property_name: StringName::from(property_name),
            hint: PropertyHint::NONE,
            hint_string: GString::new(),
            usage: PropertyUsageFlags::DEFAULT,
        }
    }

    #[doc(hidden)]
    fn argument_info(property_name: &str) -> MethodParamOrReturnInfo {
        MethodParamOrReturnInfo::new(Self::property_info(property_name), Self::param_metadata())
    }

    /// `None` means "returns nothing".
    #[doc(hidden)]
    fn return_info() -> Option<MethodParamOrReturnInfo> {
        Some(Self::argument_info(""))
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Option<T> for nullable FFI types: a null object is None

impl<T> sealed::Sealed for Option<T>
where
    T: GodotType,
    T::Ffi: GodotNullableFfi,
{
}

impl<T> GodotType for Option<T>
where
    T: GodotType,
    T::Ffi: GodotNullableFfi,
{
    type Ffi = T::Ffi;

    fn to_ffi(&self) -> T::Ffi {
        match self {
            Some(value) => value.to_ffi(),
            None => T::Ffi::null(),
        }
    }

    fn into_ffi(self) -> T::Ffi {
        self.map_or_else(T::Ffi::null, T::into_ffi)
    }

    fn try_from_ffi(ffi: T::Ffi) -> Result<Self, ConvertError> {
        if ffi.is_null() {
            Ok(None)
        } else {
            T::try_from_ffi(ffi).map(Some)
        }
    }

    fn param_metadata() -> sys::GDExtensionClassMethodArgumentMetadata {
        T::param_metadata()
    }

    fn class_name() -> ClassName {
        T::class_name()
    }

    fn property_info(property_name: &str) -> PropertyInfo {
        T::property_info(property_name)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// () is the return type of procedures

impl sealed::Sealed for () {}

impl GodotFfiVariant for () {
    fn ffi_to_variant(&self) -> Variant {
        Variant::nil()
    }

    fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        let actual = variant.get_type();
        if actual == VariantType::NIL {
            Ok(())
        } else {
            Err(ConvertError::variant_type(VariantType::NIL, actual, variant))
        }
    }
}

impl GodotType for () {
    type Ffi = ();

    fn to_ffi(&self) {}

    fn into_ffi(self) {}

    fn try_from_ffi(_: ()) -> Result<Self, ConvertError> {
        Ok(())
    }

    fn return_info() -> Option<MethodParamOrReturnInfo> {
        None
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Variant passes through untouched

impl sealed::Sealed for Variant {}

impl GodotFfiVariant for Variant {
    fn ffi_to_variant(&self) -> Variant {
        self.clone()
    }

    fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        Ok(variant.clone())
    }
}

impl GodotType for Variant {
    type Ffi = Variant;

    fn to_ffi(&self) -> Variant {
        self.clone()
    }

    fn into_ffi(self) -> Variant {
        self
    }

    fn try_from_ffi(ffi: Variant) -> Result<Self, ConvertError> {
        Ok(ffi)
    }

    /// Untyped: `NIL` together with the usage flag that widens it to "any variant".
    fn property_info(property_name: &str) -> PropertyInfo {
        PropertyInfo {
            variant_type: VariantType::NIL,
            class_name: ClassName::none(),
            property_name: StringName::from(property_name),
            hint: PropertyHint::NONE,
            hint_string: GString::new(),
            usage: PropertyUsageFlags::DEFAULT | PropertyUsageFlags::NIL_IS_VARIANT,
        }
    }
}
