/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::GString;
use crate::classes::{Object, RefCounted};
use crate::obj::Gd;

engine_class! {
    /// Base class of serializable data containers, such as [`Material`][crate::classes::Material] or
    /// [`TileSet`][crate::classes::TileSet].
    pub struct Resource: RefCounted: Object;
    memory = MemRefCounted, MemRefCounted;
    init_level = Core;
    instantiable;
}

engine_methods! {
    impl Resource {
        /// Sets the path of the resource, e.g. `"res://noise.tres"`.
        fn set_path(&mut self, path: &str) = 83702148;
        fn get_path(&self) -> GString = 201670096;

        fn set_name(&mut self, name: &str) = 83702148;
        fn get_name(&self) -> GString = 201670096;

        fn set_local_to_scene(&mut self, enable: bool) = 2586408642;
        fn is_local_to_scene(&self) -> bool = 36873697;

        /// Emits the `changed` signal, e.g. after modifying a property without a setter.
        fn emit_changed(&mut self) = 3218959716;

        /// Shallow copy; nested resources are shared with the original.
        fn duplicate(&self) -> Option<Gd<Resource>> = 482882304, defaults(false);

        /// Copy that also duplicates nested resources.
        fn duplicate_deep(&self) -> Option<Gd<Resource>> as duplicate = 482882304, defaults(true);
    }
}

engine_interface! {
    /// Virtual methods of [`Resource`].
    pub trait IResource {
        /// Called for resources that are local to a scene, when the scene is instantiated.
        fn setup_local_to_scene(&mut self);
    }
}
