/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::classes::{Object, RefCounted, Resource};
use crate::obj::Gd;

engine_class! {
    /// Abstract base class for materials, which define how geometry is drawn.
    pub struct Material: Resource: RefCounted: Object;
    memory = MemRefCounted, MemRefCounted;
    init_level = Scene;
    not_instantiable;
}

engine_methods! {
    impl Material {
        /// Material drawn after this one; `None` removes it.
        fn set_next_pass(&mut self, next_pass: Option<&Gd<Material>>) = 2757459619;
        fn get_next_pass(&self) -> Option<Gd<Material>> = 5934680;

        /// Sorting order for transparent objects; higher priorities are drawn on top.
        fn set_render_priority(&mut self, priority: i32) = 1286410249;
        fn get_render_priority(&self) -> i32 = 3905245786;

        /// Opens the converted shader code in the editor. Only available in the editor.
        fn inspect_native_shader_code(&mut self) = 3218959716;

        /// Placeholder used in place of this material when it cannot be loaded.
        fn create_placeholder(&self) -> Option<Gd<Resource>> = 121922552;
    }
}

engine_interface! {
    /// Virtual methods of [`Material`], for custom material classes.
    pub trait IMaterial {
        /// Kind of shader used by this material.
        fn get_shader_mode(&self) -> ShaderMode;

        fn can_do_next_pass(&self) -> bool;
        fn can_use_render_priority(&self) -> bool;
    }
}

engine_enum! {
    /// Kind of shader, named `Shader.Mode` in the engine.
    pub enum ShaderMode {
        SPATIAL = 0,
        CANVAS_ITEM = 1,
        PARTICLES = 2,
        SKY = 3,
        FOG = 4,
    }
}
