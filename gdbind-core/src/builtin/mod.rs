/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Built-in types like `Vector2`, `GString` and `Variant`.
//!
//! Opaque types (`GString`, `StringName`, `VariantArray`, `Variant`) wrap engine memory and are created, copied and
//! destroyed through engine functions. Value types (`Vector2`, `Color`, ...) are plain `#[repr(C)]` structs whose
//! layout matches the engine's; math is delegated to `glam`.

mod array;
mod color;
mod gstring;
mod string_name;
mod variant;
mod vectors;

pub use array::{Iter, VariantArray};
pub use color::Color;
pub use gstring::GString;
pub use string_name::StringName;
pub use variant::Variant;
pub use vectors::{Vector2, Vector2i, Vector3};

pub use crate::sys::VariantType;

/// Floating-point type used for vectors and other math types.
///
/// `f32` by default; `f64` with the `double-precision` feature, which must match the engine's `precision=double` build.
#[cfg(not(feature = "double-precision"))]
#[allow(non_camel_case_types)]
pub type real = f32;

/// Floating-point type used for vectors and other math types.
#[cfg(feature = "double-precision")]
#[allow(non_camel_case_types)]
pub type real = f64;

#[cfg(not(feature = "double-precision"))]
pub(crate) mod real_glam {
    pub type RVec2 = glam::Vec2;
    pub type RVec3 = glam::Vec3;
}

#[cfg(feature = "double-precision")]
pub(crate) mod real_glam {
    pub type RVec2 = glam::DVec2;
    pub type RVec3 = glam::DVec3;
}
