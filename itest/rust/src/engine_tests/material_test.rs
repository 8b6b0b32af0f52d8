/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::classes::{IMaterial, Material, Sky, ShaderMode};
use gdbind::obj::{Base, Gd, NewGd};
use gdbind::register::{godot_api, GodotClass};

use crate::framework::itest;

#[derive(GodotClass)]
#[class(init, base = Material)]
struct Glaze {
    base: Base<Material>,
}

#[godot_api]
impl IMaterial for Glaze {
    fn get_shader_mode(&self) -> ShaderMode {
        ShaderMode::SKY
    }
}

#[itest]
fn material_render_priority() {
    let mut glaze = Glaze::new_gd();
    assert_eq!(glaze.get_render_priority(), 0);

    glaze.set_render_priority(-3);
    assert_eq!(glaze.get_render_priority(), -3);
}

#[itest]
fn material_next_pass_chain() {
    let first: Gd<Material> = Glaze::new_gd().upcast();
    let mut second: Gd<Material> = Glaze::new_gd().upcast();

    second.set_next_pass(Some(&first));
    assert_eq!(second.get_next_pass(), Some(first.clone()));

    second.set_next_pass(None);
    assert!(second.get_next_pass().is_none());
}

#[itest]
fn material_assigned_to_sky() {
    let mut sky = Sky::new_gd();
    let glaze: Gd<Material> = Glaze::new_gd().upcast();

    sky.set_material(Some(&glaze));
    let material = sky.get_material().expect("material was assigned");
    assert_eq!(material, glaze);
    assert_eq!(material.dynamic_class_name().as_str(), "Glaze");

    let glaze = material.cast::<Glaze>();
    assert_eq!(glaze.bind().get_shader_mode(), ShaderMode::SKY);
}

#[itest]
fn material_placeholder() {
    let glaze = Glaze::new_gd();

    let placeholder = glaze.create_placeholder().expect("placeholder is created");
    assert!(placeholder.is_class("Material"));
}
