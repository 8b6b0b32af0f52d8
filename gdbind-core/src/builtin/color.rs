/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use sys::{ffi_methods, GodotFfi};

use crate::meta::impl_godot_as_self;
use crate::sys;

/// Color built-in type, in floating-point RGBA format.
///
/// Channel values are _typically_ in the range of 0 to 1, but this is not a requirement, and values outside this
/// range are explicitly allowed for e.g. High Dynamic Range (HDR). Always 32-bit floats, regardless of `real`.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,

    /// 0 is fully transparent, 1 fully opaque.
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT_BLACK: Self = Self::from_rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);

    /// Constructs a new `Color` with the given components.
    pub const fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Constructs a new `Color` with the given color components, and the alpha channel set to 1.
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::from_rgba(r, g, b, 1.0)
    }

    /// Constructs a new `Color` from bytes. 0 is mapped to 0.0, 255 is mapped to 1.0.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_rgba(from_u8(r), from_u8(g), from_u8(b), from_u8(a))
    }

    /// Packs the color into 32 bits, one byte per channel in RGBA order. Channels are clamped to `[0, 1]`.
    pub fn to_rgba32(self) -> u32 {
        u32::from_be_bytes([to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)])
    }

    /// Returns a copy with the alpha channel replaced.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation of all four channels.
    pub fn lerp(self, to: Self, weight: f32) -> Self {
        let from = glam::Vec4::new(self.r, self.g, self.b, self.a);
        let to = glam::Vec4::new(to.r, to.g, to.b, to.a);
        let mixed = from.lerp(to, weight);

        Self::from_rgba(mixed.x, mixed.y, mixed.z, mixed.w)
    }

    /// Relative luminance with Rec. 709 weights, for linear colors.
    pub fn luminance(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

fn from_u8(byte: u8) -> f32 {
    byte as f32 / 255.0
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

// SAFETY: `#[repr(C)]` with four `f32`, as in the engine.
unsafe impl GodotFfi for Color {
    fn variant_type() -> sys::VariantType {
        sys::VariantType::COLOR
    }

    ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
}

impl_godot_as_self!(Color);

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Same format as Godot: `(r, g, b, a)`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bytes_survive_packing(r: u8, g: u8, b: u8, a: u8) {
            let packed = Color::from_rgba8(r, g, b, a).to_rgba32();
            prop_assert_eq!(packed, u32::from_be_bytes([r, g, b, a]));
        }
    }

    #[test]
    fn packing_clamps_hdr() {
        let hdr = Color::from_rgb(4.0, -1.0, 0.5);
        assert_eq!(hdr.to_rgba32(), 0xFF0080FF);
    }

    #[test]
    fn lerp_and_alpha() {
        let grey = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_eq!(grey, Color::from_rgb(0.5, 0.5, 0.5));
        assert_eq!(grey.with_alpha(0.0).a, 0.0);
        assert!((Color::WHITE.luminance() - 1.0).abs() < 1e-6);
    }
}
