/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Vector types with engine layout. Math is delegated to `glam`.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use sys::{ffi_methods, GodotFfi};

use crate::builtin::real;
use crate::builtin::real_glam::{RVec2, RVec3};
use crate::meta::impl_godot_as_self;
use crate::sys;

/// Implements component-wise operators through `new()` and the listed fields.
macro_rules! impl_vector_operators {
    ($Vector:ty, $Scalar:ty, ($($c:ident),*)) => {
        impl Add for $Vector {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self::new($(self.$c + rhs.$c),*)
            }
        }

        impl AddAssign for $Vector {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl Sub for $Vector {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self::new($(self.$c - rhs.$c),*)
            }
        }

        impl SubAssign for $Vector {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl Mul<$Scalar> for $Vector {
            type Output = Self;

            fn mul(self, rhs: $Scalar) -> Self {
                Self::new($(self.$c * rhs),*)
            }
        }

        impl Neg for $Vector {
            type Output = Self;

            fn neg(self) -> Self {
                Self::new($(-self.$c),*)
            }
        }
    };
}

/// Implements `GodotFfi` for a POD vector whose layout matches the engine's.
macro_rules! impl_vector_ffi {
    ($Vector:ty, $variant_type:ident) => {
        // SAFETY: `#[repr(C)]` with the same field order and element type as the engine.
        unsafe impl GodotFfi for $Vector {
            fn variant_type() -> sys::VariantType {
                sys::VariantType::$variant_type
            }

            ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
        }

        impl_godot_as_self!($Vector);
    };
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Vector2

/// Vector used for 2D math using floating point coordinates.
///
/// Uses 32-bit floats unless the `double-precision` feature is enabled, which must match the engine build.
#[derive(Default, Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vector2 {
    pub x: real,
    pub y: real,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: real, y: real) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> real {
        self.to_glam().length()
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    pub fn normalized(self) -> Self {
        Self::from_glam(self.to_glam().normalize_or_zero())
    }

    pub fn dot(self, with: Self) -> real {
        self.to_glam().dot(with.to_glam())
    }

    pub fn distance_to(self, to: Self) -> real {
        self.to_glam().distance(to.to_glam())
    }

    /// Linear interpolation, `weight` 0 yields `self` and 1 yields `to`.
    pub fn lerp(self, to: Self, weight: real) -> Self {
        Self::from_glam(self.to_glam().lerp(to.to_glam(), weight))
    }

    /// Rounds each component towards zero.
    pub fn cast_int(self) -> Vector2i {
        Vector2i::new(self.x as i32, self.y as i32)
    }

    fn from_glam(v: RVec2) -> Self {
        Self::new(v.x, v.y)
    }

    fn to_glam(self) -> RVec2 {
        RVec2::new(self.x, self.y)
    }
}

impl_vector_operators!(Vector2, real, (x, y));
impl_vector_ffi!(Vector2, VECTOR2);

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Vector2i

/// Vector used for 2D math using integer coordinates, such as tile sizes and grid positions.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vector2i {
    pub x: i32,
    pub y: i32,
}

impl Vector2i {
    pub const ZERO: Self = Self::new(0, 0);
    pub const ONE: Self = Self::new(1, 1);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> real {
        self.cast_float().length()
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::from_glam(self.to_glam().min(other.to_glam()))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::from_glam(self.to_glam().max(other.to_glam()))
    }

    pub fn cast_float(self) -> Vector2 {
        Vector2::new(self.x as real, self.y as real)
    }

    fn from_glam(v: glam::IVec2) -> Self {
        Self::new(v.x, v.y)
    }

    fn to_glam(self) -> glam::IVec2 {
        glam::IVec2::new(self.x, self.y)
    }
}

impl_vector_operators!(Vector2i, i32, (x, y));
impl_vector_ffi!(Vector2i, VECTOR2I);

impl fmt::Display for Vector2i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Vector3

/// Vector used for 3D math using floating point coordinates.
#[derive(Default, Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vector3 {
    pub x: real,
    pub y: real,
    pub z: real,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);

    pub const fn new(x: real, y: real, z: real) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> real {
        self.to_glam().length()
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    pub fn normalized(self) -> Self {
        Self::from_glam(self.to_glam().normalize_or_zero())
    }

    pub fn dot(self, with: Self) -> real {
        self.to_glam().dot(with.to_glam())
    }

    pub fn cross(self, with: Self) -> Self {
        Self::from_glam(self.to_glam().cross(with.to_glam()))
    }

    pub fn distance_to(self, to: Self) -> real {
        self.to_glam().distance(to.to_glam())
    }

    pub fn lerp(self, to: Self, weight: real) -> Self {
        Self::from_glam(self.to_glam().lerp(to.to_glam(), weight))
    }

    fn from_glam(v: RVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    fn to_glam(self) -> RVec3 {
        RVec3::new(self.x, self.y, self.z)
    }
}

impl_vector_operators!(Vector3, real, (x, y, z));
impl_vector_ffi!(Vector3, VECTOR3);

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: real = 1e-4;

    fn finite() -> impl Strategy<Value = real> {
        -1000.0 as real..1000.0 as real
    }

    proptest! {
        #[test]
        fn normalized_has_unit_length(x in finite(), y in finite(), z in finite()) {
            let v = Vector3::new(x, y, z);
            prop_assume!(v.length() > EPS);

            prop_assert!((v.normalized().length() - 1.0).abs() < EPS);
        }

        #[test]
        fn cross_is_orthogonal(a in (finite(), finite(), finite()), b in (finite(), finite(), finite())) {
            let a = Vector3::new(a.0, a.1, a.2).normalized();
            let b = Vector3::new(b.0, b.1, b.2).normalized();
            let c = a.cross(b);

            prop_assert!(c.dot(a).abs() < 1e-3);
            prop_assert!(c.dot(b).abs() < 1e-3);
        }

        #[test]
        fn lerp_hits_endpoints(x in finite(), y in finite()) {
            let from = Vector2::new(x, y);
            let to = Vector2::new(y, x);

            prop_assert_eq!(from.lerp(to, 0.0), from);
            prop_assert!(from.lerp(to, 1.0).distance_to(to) < EPS * 10.0);
        }
    }

    #[test]
    fn zero_normalizes_to_zero() {
        assert_eq!(Vector2::ZERO.normalized(), Vector2::ZERO);
        assert_eq!(Vector3::ZERO.normalized(), Vector3::ZERO);
    }

    #[test]
    fn integer_vectors() {
        let tile = Vector2i::new(16, 16);

        assert_eq!(tile * 2, Vector2i::new(32, 32));
        assert_eq!(tile.min(Vector2i::new(8, 20)), Vector2i::new(8, 16));
        assert_eq!(Vector2::new(3.7, -2.2).cast_int(), Vector2i::new(3, -2));
        assert_eq!(Vector2i::new(3, 4).length(), 5.0);
    }

    #[test]
    fn display() {
        assert_eq!(Vector2i::new(1, -2).to_string(), "(1, -2)");
        assert_eq!(Vector3::new(1.0, 0.5, 0.0).to_string(), "(1, 0.5, 0)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_layout() {
        let json = serde_json::to_string(&Vector2i::new(4, 8)).unwrap();
        assert_eq!(json, r#"{"x":4,"y":8}"#);

        let back: Vector2i = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Vector2i::new(4, 8));
    }

    #[test]
    fn ffi_layout() {
        assert_eq!(std::mem::size_of::<Vector2>(), 2 * std::mem::size_of::<real>());
        assert_eq!(std::mem::size_of::<Vector2i>(), 8);
        assert_eq!(std::mem::size_of::<Vector3>(), 3 * std::mem::size_of::<real>());
    }
}
