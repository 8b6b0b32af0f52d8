/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::mem::ManuallyDrop;

use crate::obj::{Gd, GodotClass, InstanceId};
use crate::sys;

/// Restricted version of `Gd`, to hold the base instance inside a user's `GodotClass`.
///
/// Behaves similarly to [`Gd`][crate::obj::Gd], but is more constrained. Cannot be constructed by the user.
pub struct Base<T: GodotClass> {
    // Weak reference to the base object. The base object owns the user instance, not the other way around: holding
    // a strong reference here would keep ref-counted objects alive forever.
    obj: ManuallyDrop<Gd<T>>,
}

impl<T: GodotClass> Base<T> {
    /// "Copy constructor": allows to share a `Base<T>` weak pointer.
    ///
    /// The return value is a weak pointer, so it will not keep the instance alive.
    ///
    /// # Safety
    /// `base` must be alive at the time of invocation, i.e. user `init()` (which could technically destroy it) must
    /// not have run yet.
    pub(crate) unsafe fn from_base(base: &Base<T>) -> Base<T> {
        Base {
            obj: ManuallyDrop::new(Gd::from_obj_sys_weak(base.obj.obj_sys())),
        }
    }

    /// # Safety
    /// `base_ptr` must point to a live object of class `T`.
    pub(crate) unsafe fn from_sys(base_ptr: sys::GDExtensionObjectPtr) -> Self {
        assert!(!base_ptr.is_null(), "instance base is null pointer");

        // Initialize only as weak pointer (don't increment reference count).
        let obj = Gd::from_obj_sys_weak(base_ptr);

        Self {
            obj: ManuallyDrop::new(obj),
        }
    }

    /// Returns a [`Gd`] referencing the same object as this reference.
    ///
    /// Using this method to call methods on the base field of a Rust object is discouraged, instead use the
    /// methods from [`WithBaseField`](super::WithBaseField) when possible.
    pub fn to_gd(&self) -> Gd<T> {
        (*self.obj).clone()
    }

    /// Weak handle to the base object, for guards that must not outlive the instance.
    pub(crate) fn weak_copy(&self) -> ManuallyDrop<Gd<T>> {
        // SAFETY: the base object owns this instance, so it is alive as long as `self` is reachable.
        ManuallyDrop::new(unsafe { Gd::from_obj_sys_weak(self.obj.obj_sys()) })
    }

    pub(crate) fn instance_id(&self) -> InstanceId {
        self.obj.instance_id_unchecked()
    }

    #[doc(hidden)]
    pub fn obj_sys(&self) -> sys::GDExtensionObjectPtr {
        self.obj.obj_sys()
    }
}

impl<T: GodotClass> Debug for Base<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Base {{ id: {} }}", self.instance_id())
    }
}

impl<T: GodotClass> Display for Base<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&*self.obj, f)
    }
}
