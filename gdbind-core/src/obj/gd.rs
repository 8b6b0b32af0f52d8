/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::ops::{Deref, DerefMut};

use sys::interface_fn;

use crate::classes::Object;
use crate::meta::error::ConvertError;
use crate::meta::{ClassName, FromGodot, GodotConvert, GodotType, ToGodot};
use crate::obj::bounds::{DeclEngine, DeclUser, Declarer, DynMemory, MemManual, MemRefCounted};
use crate::obj::{
    cap, Base, Bounds, GdDerefTarget, GdMut, GdRef, GodotClass, Inherits, InstanceId, RawGd,
};
use crate::registry::callbacks;
use crate::sys;

/// Smart pointer to objects owned by the Godot engine.
///
/// This smart pointer can only hold _objects_ in the Godot sense: instances of Godot classes (`Node`, `Resource`, etc.)
/// or user-declared classes (`#[derive(GodotClass)]`). It does **not** hold built-in types (`Vector2`, `GString`, etc.).
///
/// # Memory management
///
/// This smart pointer behaves differently depending on `T`'s associated types, see [`GodotClass`] for their
/// documentation. In particular, the memory management strategy is fully dependent on `T`:
///
/// - **Reference-counted**<br>
///   Objects of type [`RefCounted`][crate::classes::RefCounted] or inherited from it are **reference-counted**. This
///   means that every time a smart pointer is shared using [`Clone::clone()`], the reference counter is incremented,
///   and every time one is dropped, it is decremented. This ensures that the last reference (either in Rust or Godot)
///   will deallocate the object and call `T`'s destructor.<br><br>
///
/// - **Manual**<br>
///   Objects inheriting from [`Object`] which are not `RefCounted` (or inherited) are **manually-managed**.
///   Their destructor is not automatically called (unless they are part of the scene tree). Creating a `Gd<T>`
///   means that you are responsible for explicitly deallocating such objects using [`free()`][Self::free].<br><br>
///
/// - **Dynamic**<br>
///   For `T=Object`, the memory strategy is determined **dynamically**. Due to polymorphism, a `Gd<Object>` can point
///   to either reference-counted or manually-managed types at runtime. The behavior corresponds to one of the two
///   previous points. Note that if the dynamic type is also `Object`, the memory is manually-managed.
///
/// # Ownership across calls
///
/// Arguments passed to engine methods are borrowed; the engine takes its own reference if it keeps the object. Objects
/// returned by engine methods are adopted with the reference the engine already took for the caller.
#[repr(C)]
pub struct Gd<T: GodotClass> {
    // Non-null invariant: a `Gd` never holds a null object. Nullable handles use `Option<Gd<T>>`.
    pub(super) raw: RawGd<T>,
}

/// _The methods in this impl block are only available for user-declared `T`, that is,
/// structs with `#[derive(GodotClass)]` but not Godot classes like `Node` or `RefCounted`._ <br><br>
impl<T> Gd<T>
where
    T: GodotClass + Bounds<Declarer = DeclUser>,
{
    /// Creates a `Gd<T>` using a function that constructs a `T` from a provided base.
    ///
    /// Imagine you have a type `T`, which has a base field that you cannot default-initialize.
    /// The `init` function provides you with a `Base<T::Base>` object that you can use inside your `T`, which
    /// is then wrapped in a `Gd<T>`.
    ///
    /// ```no_run
    /// # use gdbind::prelude::*;
    /// #[derive(GodotClass)]
    /// #[class(base = Resource)]
    /// struct Palette {
    ///     base: Base<Resource>,
    ///     colors: i32,
    /// }
    ///
    /// let palette = Gd::from_init_fn(|base| Palette { base, colors: 16 });
    /// ```
    pub fn from_init_fn<F>(init: F) -> Self
    where
        F: FnOnce(Base<T::Base>) -> T,
    {
        let object_ptr = callbacks::create_custom(init).unwrap_or_else(|panic_msg| {
            panic!(
                "failed to create {}: init function panicked\n  {panic_msg}",
                T::class_name()
            )
        });

        // SAFETY: `create_custom` returns a fresh object with the user instance attached.
        unsafe { Gd::from_obj_sys(object_ptr) }
    }

    /// Moves a user-created object into this smart pointer, submitting ownership to the Godot engine.
    ///
    /// This is only useful for types `T` which do not store their base objects (if they have a base,
    /// you cannot construct them standalone).
    pub fn from_object(user_object: T) -> Self {
        Self::from_init_fn(move |_base| user_object)
    }

    /// Hands out a guard for a shared borrow, through which the user instance can be read.
    ///
    /// The pattern is very similar to interior mutability with standard [`RefCell`][std::cell::RefCell].
    /// You can either have multiple `GdRef` shared guards, or a single `GdMut` exclusive guard to a Rust
    /// `GodotClass` instance, independently of how many `Gd` smart pointers point to it. There are runtime
    /// checks to ensure that Rust safety rules (e.g. no `&` and `&mut` coexistence) are upheld.
    ///
    /// # Panics
    /// * If another `Gd` smart pointer pointing to the same Rust instance has a live `GdMut` guard bound.
    /// * If there is an ongoing function call from GDScript to Rust, which currently holds a `&mut T`
    ///   reference to the user instance. This can happen through re-entrancy (Rust -> GDScript -> Rust call).
    pub fn bind(&self) -> GdRef<'_, T> {
        self.raw.bind()
    }

    /// Hands out a guard for an exclusive borrow, through which the user instance can be read and written.
    ///
    /// # Panics
    /// * If another `Gd` smart pointer pointing to the same Rust instance has a live `GdRef` or `GdMut` guard bound.
    /// * If there is an ongoing function call from GDScript to Rust, which currently holds a `&T` or `&mut T`
    ///   reference to the user instance.
    pub fn bind_mut(&mut self) -> GdMut<'_, T> {
        self.raw.bind_mut()
    }
}

/// _The methods in this impl block are available for any `T`._ <br><br>
impl<T: GodotClass> Gd<T> {
    /// Looks up the given instance ID and returns the associated object, if possible.
    ///
    /// If no such instance ID is registered, or if the dynamic type of the object behind that instance ID
    /// is not compatible with `T`, then `Err` is returned.
    pub fn try_from_instance_id(instance_id: InstanceId) -> Result<Self, ConvertError> {
        let error = || {
            ConvertError::new(format!(
                "Instance ID {instance_id} does not belong to a valid object of class '{}'",
                T::class_name()
            ))
        };

        // SAFETY: the engine returns null or a live object for the ID.
        let untyped = unsafe {
            let ptr = interface_fn!(object_get_instance_from_id)(instance_id.to_u64());
            if ptr.is_null() {
                return Err(error());
            }

            Gd::<Object>::from_obj_sys(ptr)
        };

        untyped.owned_cast::<T>().map_err(|_untyped| error())
    }

    /// ⚠️ Looks up the given instance ID and returns the associated object.
    ///
    /// # Panics
    /// If no such instance ID is registered, or if the dynamic type of the object behind that instance ID
    /// is not compatible with `T`.
    pub fn from_instance_id(instance_id: InstanceId) -> Self {
        Self::try_from_instance_id(instance_id).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns the instance ID of this object, or `None` if the object is dead or null.
    pub fn instance_id_or_none(&self) -> Option<InstanceId> {
        let known_id = self.instance_id_unchecked();

        // Refreshes the internal cached ID on every call, as we cannot be sure that the object has not been
        // destroyed since last time.
        if known_id.lookup_validity() {
            Some(known_id)
        } else {
            None
        }
    }

    /// ⚠️ Returns the instance ID of this object (panics when dead).
    ///
    /// # Panics
    /// If this object is no longer alive (registered in Godot's object database).
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id_or_none().unwrap_or_else(|| {
            panic!(
                "failed to call instance_id() on destroyed object; \
                use instance_id_or_none() or keep your objects alive"
            )
        })
    }

    /// Returns the last known, possibly invalid instance ID of this object.
    ///
    /// This function does not check that the returned instance ID points to a valid instance!
    /// Unless performance is a problem, use [`instance_id()`][Self::instance_id] instead.
    pub fn instance_id_unchecked(&self) -> InstanceId {
        self.raw
            .instance_id_unchecked()
            .unwrap_or_else(|| unreachable!("Gd<{}> is never null", T::class_name()))
    }

    /// Checks if this smart pointer points to a live object (read description!).
    ///
    /// Using this method is often indicative of bad design -- you should dispose of your pointers once an object is
    /// destroyed. However, this method exists because GDScript uses it and there may be **rare** use cases.
    ///
    /// Do not use this method to check if you can safely access an object. Accessing dead objects is generally safe
    /// and will panic in a defined manner. Encountering such panics is almost always a bug you should fix, and not a
    /// runtime condition to check against.
    pub fn is_instance_valid(&self) -> bool {
        self.raw.is_instance_valid()
    }

    /// **Upcast:** convert into a smart pointer to a base class. Always succeeds.
    ///
    /// Moves out of this value. If you want to create _another_ smart pointer instance,
    /// use this idiom:
    /// ```no_run
    /// # use gdbind::prelude::*;
    /// #[derive(GodotClass)]
    /// #[class(init, base = Node)]
    /// struct MyClass {}
    ///
    /// let obj: Gd<MyClass> = MyClass::new_alloc();
    /// let base = obj.clone().upcast::<Node>();
    /// # obj.free();
    /// ```
    pub fn upcast<Base>(self) -> Gd<Base>
    where
        Base: GodotClass,
        T: Inherits<Base>,
    {
        self.owned_cast()
            .unwrap_or_else(|from| panic!("upcast from {from:?} to {} failed", Base::class_name()))
    }

    /// **Upcast shared-ref:** access this object as a shared reference to a base class.
    pub fn upcast_ref<Base>(&self) -> &Base
    where
        Base: GodotClass + Bounds<Declarer = DeclEngine>,
        T: Inherits<Base>,
    {
        self.raw.as_upcast_ref::<Base>().as_target()
    }

    /// **Upcast exclusive-ref:** access this object as an exclusive reference to a base class.
    pub fn upcast_mut<Base>(&mut self) -> &mut Base
    where
        Base: GodotClass + Bounds<Declarer = DeclEngine>,
        T: Inherits<Base>,
    {
        self.raw.as_upcast_mut::<Base>().as_target_mut()
    }

    /// **Downcast:** try to convert into a smart pointer to a derived class.
    ///
    /// If `T`'s dynamic type is not `Derived` or one of its subclasses, `Err(self)` is returned, meaning you can reuse
    /// the original object for further casts.
    pub fn try_cast<Derived>(self) -> Result<Gd<Derived>, Self>
    where
        Derived: GodotClass + Inherits<T>,
    {
        self.owned_cast()
    }

    /// ⚠️ **Downcast:** convert into a smart pointer to a derived class. Panics on error.
    ///
    /// # Panics
    /// If the class' dynamic type is not `Derived` or one of its subclasses. Use [`Self::try_cast()`] if you want to
    /// check the result.
    pub fn cast<Derived>(self) -> Gd<Derived>
    where
        Derived: GodotClass + Inherits<T>,
    {
        self.owned_cast().unwrap_or_else(|from| {
            panic!(
                "downcast from {from:?} to {} failed; instance {from}",
                Derived::class_name()
            )
        })
    }

    /// Returns the name of the dynamic class, e.g. `FastNoiseLite` for a `Gd<Noise>` holding one.
    pub fn dynamic_class_name(&self) -> ClassName {
        let object: &Object = self.raw.as_upcast_ref::<Object>().as_target();
        ClassName::new_dynamic(object.get_class().to_string())
    }

    fn owned_cast<U>(self) -> Result<Gd<U>, Self>
    where
        U: GodotClass,
    {
        self.raw
            .owned_cast()
            .map(|raw| Gd { raw })
            .map_err(|raw| Self { raw })
    }

    /// Create default instance for all types that have `GodotDefault`.
    ///
    /// Deliberately more loose than `Gd::default()`, does not require ref-counted memory strategy for user types.
    pub(crate) fn default_instance() -> Self
    where
        T: cap::GodotDefault,
    {
        <T::Declarer as Declarer>::default_gd::<T>()
    }

    #[doc(hidden)]
    pub fn obj_sys(&self) -> sys::GDExtensionObjectPtr {
        self.raw.obj_sys()
    }

    /// Adopts an object pointer without touching its reference count.
    ///
    /// # Safety
    /// `ptr` must point to a live object of class `T`, whose reference (if any) is owned by the caller and now moves
    /// into the returned handle.
    #[doc(hidden)]
    pub unsafe fn from_obj_sys_weak(ptr: sys::GDExtensionObjectPtr) -> Self {
        Self::from_ffi_nonnull(RawGd::from_obj_sys_weak(ptr))
    }

    /// Creates a strong handle, initializing or incrementing the reference count.
    ///
    /// # Safety
    /// `ptr` must point to a live object of class `T`.
    #[doc(hidden)]
    pub unsafe fn from_obj_sys(ptr: sys::GDExtensionObjectPtr) -> Self {
        Self::from_ffi_nonnull(RawGd::from_obj_sys(ptr))
    }

    fn from_ffi_nonnull(raw: RawGd<T>) -> Self {
        assert!(
            !raw.is_null(),
            "Gd<{}> cannot be constructed from a null pointer",
            T::class_name()
        );

        Self { raw }
    }
}

impl<T: GodotClass> Deref for Gd<T>
where
    GdDerefTarget<T>: Bounds<Declarer = DeclEngine>,
{
    // Target is always an engine class:
    // * if T is an engine class => T
    // * if T is a user class => T::Base
    type Target = GdDerefTarget<T>;

    fn deref(&self) -> &Self::Target {
        self.raw.as_target()
    }
}

impl<T: GodotClass> DerefMut for Gd<T>
where
    GdDerefTarget<T>: Bounds<Declarer = DeclEngine>,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.raw.as_target_mut()
    }
}

/// _The methods in this impl block are only available for objects `T` that are manually managed,
/// i.e. anything that is not `RefCounted` or inherited from it._ <br><br>
impl<T> Gd<T>
where
    T: GodotClass + Bounds<Memory = MemManual>,
{
    /// Destroy the manually-managed Godot object.
    ///
    /// Consumes this smart pointer and renders all other `Gd` smart pointers (as well as any GDScript references) to
    /// the same object immediately invalid. Using those `Gd` instances will lead to panics, but not undefined behavior.
    ///
    /// This operation is **safe** and effectively prevents double-free.
    ///
    /// Not calling `free()` on manually-managed instances causes memory leaks, unless their ownership is delegated,
    /// for example to the node tree in case of nodes.
    ///
    /// # Panics
    /// - When the referred-to object has already been destroyed.
    /// - When this is invoked on an upcast `Gd<Object>` that dynamically points to a reference-counted type (i.e.
    ///   operation not supported).
    /// - When the object is bound by an ongoing `bind()` or `bind_mut()` call (through a separate `Gd` pointer).
    pub fn free(self) {
        // Note: this method is NOT invoked when the free() call happens dynamically (e.g. through GDScript or
        // reflection). As such, do not use it for operations and validations to perform upon destruction.

        // Runtime check in case of T=Object, no-op otherwise.
        let ref_counted = T::DynMemory::is_ref_counted(&self.raw);
        assert_ne!(
            ref_counted, Some(true),
            "called free() on Gd<Object> which points to a RefCounted dynamic type; free() only supported for \
            manually managed types\n  object: {self:?}"
        );

        // If ref_counted returned None, that means the instance was destroyed.
        assert!(
            ref_counted == Some(false) && self.is_instance_valid(),
            "called free() on already destroyed object"
        );

        let bound = <T::Declarer as Declarer>::is_bound(&self.raw);
        assert!(
            !bound,
            "called free() while a bind() or bind_mut() call is active"
        );

        // SAFETY: object alive as checked. This destroys the instance storage too (through the free callback).
        unsafe {
            interface_fn!(object_destroy)(self.raw.obj_sys());
        }

        // Manual memory: dropping the handle would be a no-op, but skip the bookkeeping anyway.
        std::mem::forget(self);
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Trait impls

impl<T: GodotClass> GodotConvert for Gd<T> {
    type Via = Gd<T>;
}

impl<T: GodotClass> ToGodot for Gd<T> {
    fn to_godot(&self) -> Self::Via {
        self.clone()
    }
}

impl<T: GodotClass> FromGodot for Gd<T> {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Ok(via)
    }
}

impl<T: GodotClass> crate::meta::sealed::Sealed for Gd<T> {}

impl<T: GodotClass> GodotType for Gd<T> {
    type Ffi = RawGd<T>;

    fn to_ffi(&self) -> Self::Ffi {
        self.raw.clone()
    }

    fn into_ffi(self) -> Self::Ffi {
        self.raw
    }

    fn try_from_ffi(raw: Self::Ffi) -> Result<Self, ConvertError> {
        if raw.is_null() {
            Err(ConvertError::null_object())
        } else {
            Ok(Self { raw })
        }
    }

    fn class_name() -> ClassName {
        T::class_name()
    }
}

impl<T> Default for Gd<T>
where
    T: cap::GodotDefault + Bounds<Memory = MemRefCounted>,
{
    /// Creates a default-constructed `T` inside a smart pointer.
    ///
    /// This is equivalent to the GDScript expression `T.new()`, and to the shorter Rust expression `T::new_gd()`.
    ///
    /// This trait is only implemented for reference-counted classes. Classes with manually-managed memory (e.g.
    /// `Node`) are not covered, because they need explicit memory management. `T::new_alloc()` should be used for
    /// those instead.
    fn default() -> Self {
        Self::default_instance()
    }
}

impl<T: GodotClass> Clone for Gd<T> {
    fn clone(&self) -> Self {
        sys::out!("Gd::clone");
        Self {
            raw: self.raw.clone(),
        }
    }
}

impl<T: GodotClass> PartialEq for Gd<T> {
    /// ⚠️ Returns whether two `Gd` pointers point to the same object.
    ///
    /// Compares instance IDs, so this also works for objects that are no longer alive.
    fn eq(&self, other: &Self) -> bool {
        self.instance_id_unchecked() == other.instance_id_unchecked()
    }
}

impl<T: GodotClass> Eq for Gd<T> {}

impl<T: GodotClass> Display for Gd<T> {
    /// Uses the engine's `Object::to_string()`, which user classes can override.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let object: &Object = self.raw.as_upcast_ref::<Object>().as_target();
        write!(f, "{}", object.to_string())
    }
}

impl<T: GodotClass> Debug for Gd<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.is_instance_valid() {
            let id = self.instance_id_unchecked();
            let class = self.dynamic_class_name();
            write!(f, "Gd {{ id: {id}, class: {class} }}")
        } else {
            write!(f, "Gd {{ freed obj }}")
        }
    }
}

impl<T: GodotClass> std::panic::UnwindSafe for Gd<T> {}
impl<T: GodotClass> std::panic::RefUnwindSafe for Gd<T> {}
