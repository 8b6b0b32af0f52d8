/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::{GString, Variant};
use crate::meta::error::ConvertError;
use crate::meta::{GodotFfiVariant, GodotType};
use crate::sys;

/// Names the [`GodotType`] that represents `Self` at the engine boundary.
///
/// Engine-native types use `Via = Self`. Anything else picks the native type it maps to, for example `String` goes
/// through [`GString`](crate::builtin::GString).
pub trait GodotConvert {
    type Via: GodotType;
}

/// Conversion of a Rust value into its engine representation.
pub trait ToGodot: Sized + GodotConvert {
    /// Borrowing conversion; usually a clone.
    fn to_godot(&self) -> Self::Via;

    fn to_variant(&self) -> Variant {
        self.to_godot().to_ffi().ffi_to_variant()
    }
}

/// Fallible conversion from the engine representation back into Rust.
///
/// A value passed through [`ToGodot`] and back is expected to compare equal to the original.
pub trait FromGodot: Sized + GodotConvert {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError>;

    /// # Panics
    /// If the conversion fails.
    fn from_godot(via: Self::Via) -> Self {
        match Self::try_from_godot(via) {
            Ok(value) => value,
            Err(err) => panic!("cannot convert to {}: {err}", std::any::type_name::<Self>()),
        }
    }

    fn try_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        let ffi = <Self::Via as GodotType>::Ffi::ffi_from_variant(variant)?;
        Self::Via::try_from_ffi(ffi).and_then(Self::try_from_godot)
    }

    /// # Panics
    /// If the variant holds another type, or its value does not fit.
    fn from_variant(variant: &Variant) -> Self {
        match Self::try_from_variant(variant) {
            Ok(value) => value,
            Err(err) => panic!(
                "cannot convert variant to {}: {err}",
                std::any::type_name::<Self>()
            ),
        }
    }
}

/// Conversion traits for a type that is its own engine representation.
#[macro_export]
#[doc(hidden)]
macro_rules! impl_godot_as_self {
    ($T:ty) => {
        impl $crate::meta::GodotConvert for $T {
            type Via = $T;
        }

        impl $crate::meta::ToGodot for $T {
            #[inline]
            fn to_godot(&self) -> Self::Via {
                self.clone()
            }
        }

        impl $crate::meta::FromGodot for $T {
            #[inline]
            fn try_from_godot(via: Self::Via) -> Result<Self, $crate::meta::error::ConvertError> {
                Ok(via)
            }
        }
    };
}

impl_godot_as_self!(bool);
impl_godot_as_self!(i64);
impl_godot_as_self!(f64);
impl_godot_as_self!(());

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Option<T>: None maps to a null object or a nil variant

impl<T> GodotConvert for Option<T>
where
    T: GodotConvert,
    Option<T::Via>: GodotType,
{
    type Via = Option<T::Via>;
}

impl<T> ToGodot for Option<T>
where
    T: ToGodot,
    Option<T::Via>: GodotType,
{
    fn to_godot(&self) -> Self::Via {
        self.as_ref().map(T::to_godot)
    }

    fn to_variant(&self) -> Variant {
        self.as_ref().map_or_else(Variant::nil, T::to_variant)
    }
}

impl<T> FromGodot for Option<T>
where
    T: FromGodot,
    Option<T::Via>: GodotType,
{
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        via.map(T::try_from_godot).transpose()
    }

    fn try_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        // Nil is checked on the variant itself; `T::Via` would reject it.
        if variant.is_nil() {
            Ok(None)
        } else {
            T::try_from_variant(variant).map(Some)
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Borrowed and Rust-native strings

impl<T: GodotConvert> GodotConvert for &T {
    type Via = T::Via;
}

impl<T: ToGodot> ToGodot for &T {
    fn to_godot(&self) -> Self::Via {
        T::to_godot(self)
    }

    fn to_variant(&self) -> Variant {
        T::to_variant(self)
    }
}

impl GodotConvert for &str {
    type Via = GString;
}

impl ToGodot for &str {
    fn to_godot(&self) -> GString {
        GString::from(*self)
    }
}

impl GodotConvert for String {
    type Via = GString;
}

impl ToGodot for String {
    fn to_godot(&self) -> GString {
        GString::from(self.as_str())
    }
}

impl FromGodot for String {
    fn try_from_godot(via: GString) -> Result<Self, ConvertError> {
        Ok(via.to_string())
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Narrow scalars: stored as the engine's 64-bit int/float, with argument metadata naming the real width

macro_rules! impl_narrow_scalar {
    ($($T:ty => $Wide:ty, $metadata:ident, $from_wide:expr;)*) => {$(
        impl crate::meta::sealed::Sealed for $T {}

        impl GodotType for $T {
            type Ffi = $Wide;

            fn to_ffi(&self) -> $Wide {
                <$Wide>::from(*self)
            }

            fn into_ffi(self) -> $Wide {
                <$Wide>::from(self)
            }

            fn try_from_ffi(wide: $Wide) -> Result<Self, ConvertError> {
                let from_wide: fn($Wide) -> Result<$T, ConvertError> = $from_wide;
                from_wide(wide)
            }

            fn param_metadata() -> sys::GDExtensionClassMethodArgumentMetadata {
                sys::$metadata
            }
        }

        impl GodotConvert for $T {
            type Via = $T;
        }

        impl ToGodot for $T {
            fn to_godot(&self) -> $T {
                *self
            }
        }

        impl FromGodot for $T {
            fn try_from_godot(via: $T) -> Result<Self, ConvertError> {
                Ok(via)
            }
        }
    )*};
}

/// Range-checked narrowing from the engine's `int`.
fn narrow_int<T: TryFrom<i64>>(wide: i64) -> Result<T, ConvertError> {
    T::try_from(wide).map_err(|_| ConvertError::int_range::<T>(wide))
}

impl_narrow_scalar! {
    i32 => i64, GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_INT32, narrow_int;
    i16 => i64, GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_INT16, narrow_int;
    i8 => i64, GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_INT8, narrow_int;
    u32 => i64, GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_UINT32, narrow_int;
    u16 => i64, GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_UINT16, narrow_int;
    u8 => i64, GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_UINT8, narrow_int;

    // Precision loss is accepted for floats.
    f32 => f64, GDEXTENSION_METHOD_ARGUMENT_METADATA_REAL_IS_FLOAT, |wide| Ok(wide as f32);
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_ints_are_range_checked() {
        assert_eq!(i32::try_from_ffi(-7).unwrap(), -7);
        assert_eq!(u8::try_from_ffi(255).unwrap(), 255);

        let err = i32::try_from_ffi(i64::MAX).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("value out of range for `i32` (value: {})", i64::MAX)
        );

        assert!(u32::try_from_ffi(-1).is_err());
        assert!(i8::try_from_ffi(128).is_err());
    }

    #[test]
    fn ints_widen_to_engine_int() {
        assert_eq!(7_i32.into_ffi(), 7_i64);
        assert_eq!(u16::MAX.to_ffi(), 65535_i64);
    }

    #[test]
    fn float_is_lossy() {
        let wide = 0.1_f32.to_ffi();
        assert_eq!(wide, 0.1_f32 as f64);
        assert_eq!(f32::try_from_ffi(wide).unwrap(), 0.1_f32);
    }

    #[test]
    fn metadata_per_width() {
        assert_eq!(
            <i32 as GodotType>::param_metadata(),
            sys::GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_INT32
        );
        assert_eq!(
            <u8 as GodotType>::param_metadata(),
            sys::GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_UINT8
        );
        assert_eq!(
            <i64 as GodotType>::param_metadata(),
            sys::GDEXTENSION_METHOD_ARGUMENT_METADATA_INT_IS_INT64
        );
    }

    #[test]
    fn godot_conversion_is_identity() {
        assert!(bool::from_godot(true));
        assert_eq!(i64::from_godot(-3), -3);
        assert_eq!(i32::try_from_godot(12).unwrap(), 12);
    }
}
