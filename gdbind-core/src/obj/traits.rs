/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::meta::ClassName;
use crate::obj::bounds::{DeclEngine, DeclUser, MemManual, MemRefCounted};
use crate::obj::{Base, BaseMut, BaseRef, Bounds, Gd};
use crate::sys;

/// A class the engine knows: either one of its own, or a Rust struct with `#[derive(GodotClass)]`.
///
/// Only types implementing this can live behind a [`Gd<T>`]. Implement it through the derive, never by hand.
pub trait GodotClass: Bounds + Sized + 'static {
    /// Direct superclass. For user classes, always an engine class.
    type Base: GodotClass;

    /// Level at which the class is registered. Never lower than the base class's level.
    const INIT_LEVEL: sys::InitLevel;

    /// Name under which ClassDB knows the class: the struct name, unless `#[class(rename = ...)]` says otherwise.
    fn class_name() -> ClassName;
}

/// Base of [`Object`][crate::classes::Object], which has none. Cannot be instantiated.
pub enum NoBase {}

impl GodotClass for NoBase {
    type Base = NoBase;
    const INIT_LEVEL: sys::InitLevel = sys::InitLevel::Core;

    fn class_name() -> ClassName {
        ClassName::none()
    }
}

// SAFETY: never instantiated, so no memory strategy is ever applied.
unsafe impl Bounds for NoBase {
    type Memory = MemManual;
    type DynMemory = MemManual;
    type Declarer = DeclEngine;
}

/// `Self` is `Base` or one of its subclasses.
///
/// # Safety
/// Upcasting a `Gd<Self>` to `Gd<Base>` must be sound, so this may only hold along real inheritance edges.
pub unsafe trait Inherits<Base: GodotClass>: GodotClass {}

// SAFETY: reflexive.
unsafe impl<T: GodotClass> Inherits<T> for T {}

/// Engine class with one engine-owned instance, such as `Engine`.
pub trait Singleton: GodotClass {
    /// The handle is borrowed: dropping it releases nothing, and freeing it is an error.
    fn singleton() -> Gd<Self>;
}

/// Access to the engine object of a user class, through its `Base<T>` field.
pub trait WithBaseField: GodotClass + Bounds<Declarer = DeclUser> {
    fn base_field(&self) -> &Base<Self::Base>;

    /// A new handle to the object owning `self`.
    ///
    /// Calling `bind()` or `bind_mut()` on it fails while the current method still borrows `self`.
    fn to_gd(&self) -> Gd<Self> {
        // SAFETY: the base field points to the object owning this instance.
        unsafe { Gd::from_obj_sys(self.base_field().obj_sys()) }
    }

    /// Shared access to the engine methods of the object.
    ///
    /// ```no_run
    /// use gdbind::prelude::*;
    ///
    /// #[derive(GodotClass)]
    /// #[class(init, base = Node)]
    /// struct Lamp {
    ///     base: Base<Node>,
    /// }
    ///
    /// #[godot_api]
    /// impl INode for Lamp {
    ///     fn ready(&mut self) {
    ///         godot_print!("lamp {} is ready", self.base().get_name());
    ///     }
    /// }
    /// ```
    fn base(&self) -> BaseRef<'_, Self> {
        BaseRef::new(self.base_field().weak_copy(), self)
    }

    /// Exclusive access to the engine methods of the object.
    ///
    /// Engine methods called through the guard may call back into Rust; such calls must not bind this instance again.
    fn base_mut(&mut self) -> BaseMut<'_, Self> {
        let base = self.base_field().weak_copy();
        BaseMut::new(base, self)
    }
}

/// `T::new_gd()` for ref-counted classes. Same as `Gd::<T>::default()`.
pub trait NewGd: GodotClass {
    fn new_gd() -> Gd<Self>;
}

impl<T> NewGd for T
where
    T: cap::GodotDefault + Bounds<Memory = MemRefCounted>,
{
    fn new_gd() -> Gd<Self> {
        Gd::default()
    }
}

/// `T::new_alloc()` for manually managed classes.
pub trait NewAlloc: GodotClass {
    /// The object leaks unless it is freed or handed to an owner such as the scene tree.
    #[must_use]
    fn new_alloc() -> Gd<Self>;
}

impl<T> NewAlloc for T
where
    T: cap::GodotDefault + Bounds<Memory = MemManual>,
{
    fn new_alloc() -> Gd<Self> {
        Gd::default_instance()
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Capabilities of a class, implemented by the proc-macros depending on what the user wrote.
pub mod cap {
    use super::*;
    use crate::builtin::GString;

    /// The engine can default-construct the class: `MyClass.new()` in GDScript, `Gd::default()` and friends in Rust.
    ///
    /// Engine classes get this when they are constructible. User classes get it from `#[class(init)]` or an `init()`
    /// override in the interface trait impl.
    pub trait GodotDefault: GodotClass {
        /// User classes only: builds the Rust half of a new object.
        #[doc(hidden)]
        fn __godot_user_init(_base: Base<Self::Base>) -> Self {
            unreachable!("engine class {} has no user constructor", Self::class_name())
        }
    }

    /// The interface trait impl overrides `to_string()`.
    pub trait GodotToString: GodotClass {
        #[doc(hidden)]
        fn __godot_to_string(&self) -> GString;
    }

    /// The interface trait impl overrides `on_notification()`.
    pub trait GodotNotification: GodotClass {
        #[doc(hidden)]
        fn __godot_notification(&mut self, what: i32);
    }

    /// A `#[godot_api]` inherent impl: its `#[func]` methods.
    pub trait ImplementsGodotApi: GodotClass {
        #[doc(hidden)]
        fn __register_methods();
    }

    /// The `#[var]` fields of a derived class. Runs after the methods are registered, since properties refer to
    /// accessors by name.
    pub trait ImplementsGodotExports: GodotClass {
        #[doc(hidden)]
        fn __register_exports();
    }

    /// A `#[godot_api]` interface trait impl: the table of overridden engine callbacks.
    pub trait ImplementsGodotVirtual: GodotClass {
        /// Trampoline for the engine callback `name` (such as `_ready`), or `None` if not overridden.
        #[doc(hidden)]
        fn __virtual_call(name: &str) -> sys::GDExtensionClassCallVirtual;
    }
}
