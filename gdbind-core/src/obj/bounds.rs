/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Compile-time facts about a class, used to pick the right `Gd<T>` behavior.
//!
//! Every [`GodotClass`] also implements [`Bounds`], which answers two questions:
//!
//! * **Who declares the class?** [`DeclEngine`] for engine classes such as `Node`, [`DeclUser`] for
//!   `#[derive(GodotClass)]` structs. This decides what `Gd<T>` dereferences to, and whether `bind()` exists.
//! * **How is its memory managed?** [`MemRefCounted`] for `RefCounted` and its subclasses, [`MemManual`] for other
//!   `Object` subclasses. `Object` itself can point to either; its instances use [`MemDynamic`], which inspects the
//!   instance ID at runtime.

use crate::obj::cap::GodotDefault;
use crate::obj::{Gd, GodotClass, RawGd};
use crate::sys;

mod sealed {
    pub trait Sealed {}
}
use sealed::Sealed;

/// Memory and declaration facts of a class. Generated by the class macros; see the [module docs](self).
///
/// # Safety
/// `Memory` and `DynMemory` must match the class's real position in the hierarchy. Reference counting relies on it.
pub unsafe trait Bounds {
    /// Strategy of the static type, used for construction (`new_gd()` versus `new_alloc()`).
    type Memory: Memory;

    /// Strategy applied to instances behind a `Gd<Self>`.
    type DynMemory: DynMemory;

    type Declarer: Declarer;
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Memory

/// Memory strategy of a static type.
pub trait Memory: Sealed {}

/// Memory strategy of the instances a `Gd<T>` can point to.
///
/// The reference-counting operations do nothing unless [`counts_refs`](Self::counts_refs) holds for the object.
pub trait DynMemory: Sealed {
    /// Whether the engine counts references to `obj`.
    #[doc(hidden)]
    fn counts_refs<T: GodotClass>(obj: &RawGd<T>) -> bool;

    /// Like [`counts_refs`](Self::counts_refs), but `None` if that cannot be known because the object is gone.
    #[doc(hidden)]
    fn is_ref_counted<T: GodotClass>(obj: &RawGd<T>) -> Option<bool> {
        Some(Self::counts_refs(obj))
    }

    /// Takes the first reference of a new object.
    #[doc(hidden)]
    fn maybe_init_ref<T: GodotClass>(obj: &RawGd<T>) {
        sys::out!("  init_ref  <{}>", T::class_name());
        if !obj.is_null() && Self::counts_refs(obj) {
            let ok = obj.with_ref_counted(|rc| rc.init_ref());
            assert!(ok, "init_ref() on {} failed", T::class_name());
        }
    }

    #[doc(hidden)]
    fn maybe_inc_ref<T: GodotClass>(obj: &RawGd<T>) {
        sys::out!("  inc_ref   <{}>", T::class_name());
        if !obj.is_null() && Self::counts_refs(obj) {
            let ok = obj.with_ref_counted(|rc| rc.reference());
            assert!(ok, "reference() on {} failed", T::class_name());
        }
    }

    /// Releases one reference. Returns `true` if it was the last one, in which case the caller destroys the object.
    ///
    /// # Safety
    /// Must not release more references than `obj` holds.
    #[doc(hidden)]
    unsafe fn maybe_dec_ref<T: GodotClass>(obj: &RawGd<T>) -> bool {
        sys::out!("  dec_ref   <{}>", T::class_name());
        if obj.is_null() || !Self::counts_refs(obj) {
            return false;
        }

        let is_last = obj.with_ref_counted(|rc| rc.unreference());
        sys::out!("  +-- last={is_last}");
        is_last
    }

    /// Whether ptrcalls of this kind pass the object as `Ref<T>*` rather than `T**`.
    #[doc(hidden)]
    fn pass_as_ref(_call_type: sys::PtrcallType) -> bool {
        false
    }
}

/// Always reference-counted: `RefCounted` and subclasses.
pub enum MemRefCounted {}
impl Sealed for MemRefCounted {}
impl Memory for MemRefCounted {}
impl DynMemory for MemRefCounted {
    fn counts_refs<T: GodotClass>(_obj: &RawGd<T>) -> bool {
        true
    }

    fn pass_as_ref(call_type: sys::PtrcallType) -> bool {
        matches!(call_type, sys::PtrcallType::Virtual)
    }
}

/// Never reference-counted: subclasses of `Object` outside `RefCounted`. Such objects are freed explicitly.
pub enum MemManual {}
impl Sealed for MemManual {}
impl Memory for MemManual {}
impl DynMemory for MemManual {
    fn counts_refs<T: GodotClass>(_obj: &RawGd<T>) -> bool {
        false
    }
}

/// Decided per instance, for `Gd<Object>`. The engine marks ref-counted objects in the top bit of their ID.
pub enum MemDynamic {}
impl Sealed for MemDynamic {}
impl DynMemory for MemDynamic {
    fn counts_refs<T: GodotClass>(obj: &RawGd<T>) -> bool {
        obj.instance_id_unchecked().is_some_and(|id| id.is_ref_counted())
    }

    fn is_ref_counted<T: GodotClass>(obj: &RawGd<T>) -> Option<bool> {
        // The ID of a freed object still carries the bit, but the answer would be about nothing.
        obj.is_instance_valid().then(|| Self::counts_refs(obj))
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Declarer

/// Who declares a class: the engine or the user.
pub trait Declarer: Sealed {
    /// What `Gd<T>` dereferences to: `T` itself for engine classes, `T::Base` for user classes.
    #[doc(hidden)]
    type DerefTarget<T: GodotClass>: GodotClass;

    /// Whether `obj` is a user object with a live `bind()` or `bind_mut()` guard.
    #[doc(hidden)]
    fn is_bound<T>(obj: &RawGd<T>) -> bool
    where
        T: GodotClass + Bounds<Declarer = Self>;

    #[doc(hidden)]
    fn default_gd<T>() -> Gd<T>
    where
        T: GodotDefault + Bounds<Declarer = Self>;
}

pub enum DeclEngine {}
impl Sealed for DeclEngine {}
impl Declarer for DeclEngine {
    type DerefTarget<T: GodotClass> = T;

    fn is_bound<T>(_obj: &RawGd<T>) -> bool
    where
        T: GodotClass + Bounds<Declarer = Self>,
    {
        false
    }

    fn default_gd<T>() -> Gd<T>
    where
        T: GodotDefault + Bounds<Declarer = Self>,
    {
        // SAFETY: `T` is a constructible engine class; the engine hands over a fresh object.
        unsafe { Gd::from_obj_sys(sys::interface_fn!(classdb_construct_object)(T::class_name().string_sys())) }
    }
}

pub enum DeclUser {}
impl Sealed for DeclUser {}
impl Declarer for DeclUser {
    type DerefTarget<T: GodotClass> = T::Base;

    fn is_bound<T>(obj: &RawGd<T>) -> bool
    where
        T: GodotClass + Bounds<Declarer = Self>,
    {
        obj.storage().is_some_and(|storage| storage.is_bound())
    }

    fn default_gd<T>() -> Gd<T>
    where
        T: GodotDefault + Bounds<Declarer = Self>,
    {
        Gd::from_init_fn(T::__godot_user_init)
    }
}
