/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::num::NonZeroU64;

use crate::meta::error::ConvertError;
use crate::meta::{FromGodot, GodotConvert, ToGodot};
use crate::sys;

/// Represents a non-zero instance ID.
///
/// This is its own type for type safety and to deal with the inconsistent representation in Godot as both `u64`
/// (C++) and `i64` (GDScript). You can usually treat this as an opaque value and pass it to and from GDScript.
///
/// The highest bit is set for objects inheriting `RefCounted`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct InstanceId {
    // Note: in the public API, signed values are used, consistent with GDScript.
    value: NonZeroU64,
}

impl InstanceId {
    /// Constructs an instance ID from an integer, or `None` if the integer is zero.
    ///
    /// This does *not* check if the instance is valid.
    pub fn try_from_i64(id: i64) -> Option<Self> {
        Self::try_from_u64(id as u64)
    }

    /// ⚠️ Constructs an instance ID from a non-zero integer.
    ///
    /// # Panics
    /// If `id` is zero.
    pub fn from_nonzero(id: i64) -> Self {
        Self::try_from_i64(id).unwrap_or_else(|| panic!("expected non-zero instance ID"))
    }

    pub(crate) fn try_from_u64(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(|value| Self { value })
    }

    pub fn to_i64(self) -> i64 {
        self.to_u64() as i64
    }

    /// Returns if the object with this ID inherits `RefCounted`.
    ///
    /// The engine reserves the highest bit of every ID for this.
    pub fn is_ref_counted(self) -> bool {
        self.to_u64() & (1u64 << 63) != 0
    }

    /// Returns whether an object with this ID is currently alive in the engine.
    pub fn lookup_validity(self) -> bool {
        let obj_ptr = unsafe { sys::interface_fn!(object_get_instance_from_id)(self.to_u64()) };
        !obj_ptr.is_null()
    }

    // Private: do not rely on the u64 representation outside the crate.
    pub(crate) fn to_u64(self) -> u64 {
        self.value.get()
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_i64())
    }
}

impl Debug for InstanceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "InstanceId({})", self.to_i64())
    }
}

impl GodotConvert for InstanceId {
    type Via = i64;
}

impl ToGodot for InstanceId {
    fn to_godot(&self) -> Self::Via {
        self.to_i64()
    }
}

impl FromGodot for InstanceId {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Self::try_from_i64(via).ok_or_else(ConvertError::zero_instance_id)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(InstanceId::try_from_i64(0), None);

        let err = InstanceId::try_from_godot(0).unwrap_err();
        assert_eq!(err.to_string(), "instance ID 0 does not identify an object");
    }

    #[test]
    fn signed_representation() {
        let id = InstanceId::from_nonzero(-42);
        assert_eq!(id.to_i64(), -42);
        assert_eq!(id.to_u64(), (-42_i64) as u64);
        assert_eq!(id.to_godot(), -42);
    }

    #[test]
    fn ref_counted_bit() {
        let manual = InstanceId::from_nonzero(0x1234);
        assert!(!manual.is_ref_counted());

        let ref_counted = InstanceId::try_from_u64((1 << 63) | 0x1234).unwrap();
        assert!(ref_counted.is_ref_counted());
        assert!(ref_counted.to_i64() < 0);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn from_nonzero_panics_on_zero() {
        InstanceId::from_nonzero(0);
    }

    #[test]
    fn formatting() {
        let id = InstanceId::from_nonzero(9001);
        assert_eq!(id.to_string(), "9001");
        assert_eq!(format!("{id:?}"), "InstanceId(9001)");
    }
}
