/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::classes::Object;
use crate::obj::{Gd, GodotClass, Singleton};
use crate::sys;

engine_class! {
    /// Access to engine properties: frame rates, physics ticks and editor state.
    ///
    /// Obtained with [`Engine::singleton()`][Singleton::singleton].
    pub struct Engine: Object;
    memory = MemManual, MemManual;
    init_level = Core;
    not_instantiable;
}

engine_methods! {
    impl Engine {
        /// Number of physics ticks per second.
        fn get_physics_ticks_per_second(&self) -> i32 = 3905245786;
        fn set_physics_ticks_per_second(&mut self, physics_ticks_per_second: i32) = 1286410249;

        /// Frames per second, averaged over the last second.
        fn get_frames_per_second(&self) -> f64 = 1740695150;

        /// Whether the code runs inside the editor, e.g. for `#[class(tool)]` classes.
        fn is_editor_hint(&self) -> bool = 36873697;
    }
}

impl Singleton for Engine {
    fn singleton() -> Gd<Self> {
        // SAFETY: the engine owns the singleton for the whole lifetime of the library; the handle only borrows it.
        unsafe {
            let object_ptr = sys::interface_fn!(global_get_singleton)(Self::class_name().string_sys());
            assert!(!object_ptr.is_null(), "singleton `Engine` is not available");
            Gd::from_obj_sys_weak(object_ptr)
        }
    }
}
