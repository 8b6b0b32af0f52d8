/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::Vector2i;
use crate::classes::{Object, RefCounted, Resource};

engine_class! {
    /// Library of tiles for a tile map, with their shared layers (physics, navigation, ...).
    pub struct TileSet: Resource: RefCounted: Object;
    memory = MemRefCounted, MemRefCounted;
    init_level = Scene;
    instantiable;
}

engine_methods! {
    impl TileSet {
        /// Size of a tile, in pixels.
        fn set_tile_size(&mut self, size: Vector2i) = 1130785943;
        fn get_tile_size(&self) -> Vector2i = 3690982128;

        fn set_uv_clipping(&mut self, uv_clipping: bool) = 2586408642;
        fn is_uv_clipping(&self) -> bool = 36873697;

        /// Appends a physics layer.
        fn add_physics_layer(&mut self) = 1025054187, defaults(-1);

        /// Inserts a physics layer at `to_position`; `-1` appends.
        fn add_physics_layer_at(&mut self, to_position: i32) as add_physics_layer = 1025054187;

        fn get_physics_layers_count(&self) -> i32 = 3905245786;
    }
}
