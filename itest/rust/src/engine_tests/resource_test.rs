/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::GString;
use gdbind::classes::{Resource, Sky};
use gdbind::obj::NewGd;

use crate::framework::itest;

#[itest]
fn resource_name_and_path() {
    let mut res = Resource::new_gd();
    assert_eq!(res.get_name(), GString::new());
    assert_eq!(res.get_path(), GString::new());

    res.set_name("Boulder");
    res.set_path("res://boulder.tres");
    assert_eq!(res.get_name(), GString::from("Boulder"));
    assert_eq!(res.get_path(), GString::from("res://boulder.tres"));
}

#[itest]
fn resource_local_to_scene() {
    let mut res = Resource::new_gd();
    assert!(!res.is_local_to_scene());

    res.set_local_to_scene(true);
    assert!(res.is_local_to_scene());

    // No listeners; must not fail.
    res.emit_changed();
}

#[itest]
fn resource_duplicate_keeps_class_and_properties() {
    let mut res = Resource::new_gd();
    res.set_name("Slate");

    let copy = res.duplicate().expect("duplicate() returns an object");
    assert_ne!(copy.instance_id(), res.instance_id());
    assert_eq!(copy.get_name(), GString::from("Slate"));
    assert_eq!(copy.get_class(), GString::from("Resource"));

    // The path identifies the original resource and is not copied.
    res.set_path("res://slate.tres");
    let copy = res.duplicate().expect("duplicate() returns an object");
    assert_eq!(copy.get_path(), GString::new());
}

#[itest]
fn resource_duplicate_deep_subclass() {
    let mut sky = Sky::new_gd();
    sky.set_name("Overcast");

    let copy = sky.duplicate_deep().expect("duplicate_deep() returns an object");
    assert_eq!(copy.dynamic_class_name().as_str(), "Sky");
    assert_eq!(copy.get_name(), GString::from("Overcast"));
}
