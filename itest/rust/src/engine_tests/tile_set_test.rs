/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::Vector2i;
use gdbind::classes::TileSet;
use gdbind::obj::NewGd;

use crate::framework::itest;

#[itest]
fn tile_set_tile_size() {
    let mut tiles = TileSet::new_gd();
    assert_eq!(tiles.get_tile_size(), Vector2i::new(16, 16));

    tiles.set_tile_size(Vector2i::new(32, 24));
    assert_eq!(tiles.get_tile_size(), Vector2i::new(32, 24));
}

#[itest]
fn tile_set_uv_clipping() {
    let mut tiles = TileSet::new_gd();
    assert!(!tiles.is_uv_clipping());

    tiles.set_uv_clipping(true);
    assert!(tiles.is_uv_clipping());
}

#[itest]
fn tile_set_physics_layers() {
    let mut tiles = TileSet::new_gd();
    assert_eq!(tiles.get_physics_layers_count(), 0);

    tiles.add_physics_layer();
    tiles.add_physics_layer();
    assert_eq!(tiles.get_physics_layers_count(), 2);

    tiles.add_physics_layer_at(0);
    assert_eq!(tiles.get_physics_layers_count(), 3);
}
