/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Conversions between builtin values and `Variant`, through the engine's per-type converters.

use sys::GodotFfi;

use crate::builtin::*;
use crate::meta::error::ConvertError;
use crate::meta::{GodotFfiVariant, GodotType};
use crate::sys;

macro_rules! impl_ffi_variant {
    ($T:ty) => {
        impl GodotFfiVariant for $T {
            fn ffi_to_variant(&self) -> Variant {
                // SAFETY: the converter constructs the variant in place from a value of type `$T`.
                unsafe {
                    Variant::new_with_var_uninit(|variant_ptr| {
                        let converter = sys::builtin_lifecycle_api().variant_from_type(Self::variant_type());
                        converter(variant_ptr, sys::force_mut_ptr(self.sys()));
                    })
                }
            }

            fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
                // Strict type match, no implicit conversions such as int -> float.
                let actual = variant.get_type();
                if actual != Self::variant_type() {
                    return Err(ConvertError::variant_type(Self::variant_type(), actual, variant));
                }

                // SAFETY: types match, so the converter constructs a valid `$T` in place.
                let result = unsafe {
                    Self::new_with_uninit(|self_ptr| {
                        let converter = sys::builtin_lifecycle_api().variant_to_type(Self::variant_type());
                        converter(self_ptr, sys::force_mut_ptr(variant.var_sys()));
                    })
                };

                Ok(result)
            }
        }

        impl crate::meta::sealed::Sealed for $T {}

        impl GodotType for $T {
            type Ffi = Self;

            fn to_ffi(&self) -> Self::Ffi {
                self.clone()
            }

            fn into_ffi(self) -> Self::Ffi {
                self
            }

            fn try_from_ffi(ffi: Self::Ffi) -> Result<Self, ConvertError> {
                Ok(ffi)
            }
        }
    };
}

impl_ffi_variant!(bool);
impl_ffi_variant!(i64);
impl_ffi_variant!(f64);
impl_ffi_variant!(GString);
impl_ffi_variant!(StringName);
impl_ffi_variant!(VariantArray);
impl_ffi_variant!(Vector2);
impl_ffi_variant!(Vector2i);
impl_ffi_variant!(Vector3);
impl_ffi_variant!(Color);
