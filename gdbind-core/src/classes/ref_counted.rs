/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::classes::Object;

engine_class! {
    /// Base class of all reference-counted objects.
    ///
    /// `Gd<T>` for `T: Inherits<RefCounted>` keeps the object alive; it is destroyed when the last reference goes away.
    pub struct RefCounted: Object;
    memory = MemRefCounted, MemRefCounted;
    init_level = Core;
    instantiable;
}

engine_methods! {
    impl RefCounted {
        /// Initializes the reference count of a fresh object. Returns `false` if the object is already being destroyed.
        fn init_ref(&mut self) -> bool = 2240911060;

        /// Increments the engine reference count.
        fn reference(&mut self) -> bool = 2240911060;

        /// Decrements the engine reference count. Returns `true` if this released the last reference.
        fn unreference(&mut self) -> bool = 2240911060;

        fn get_reference_count(&self) -> i32 = 3905245786;
    }
}

engine_interface! {
    /// Virtual methods of [`RefCounted`].
    pub trait IRefCounted {}
}
