/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::GString;
use gdbind::classes::{Node, Object, Resource};
use gdbind::obj::{Base, Gd, NewAlloc, NewGd, WithBaseField};
use gdbind::register::GodotClass;

use crate::framework::{expect_panic, expect_panic_containing, itest};

#[derive(GodotClass)]
#[class(init, base = Resource)]
struct Pebble {
    base: Base<Resource>,
    #[init(val = 3)]
    weight: i32,
}

impl Pebble {
    fn label(&self) -> String {
        format!("{} ({})", self.base().get_name(), self.weight)
    }

    fn rename(&mut self, name: &str) {
        self.base_mut().set_name(name);
    }
}

#[derive(GodotClass)]
#[class(init, base = Node)]
struct Cairn {
    #[base]
    root: Base<Node>,
    stones: Vec<i32>,
}

#[itest]
fn base_generated_init_uses_field_defaults() {
    let pebble = Pebble::new_gd();

    assert_eq!(pebble.bind().weight, 3);
    assert_eq!(pebble.get_class(), GString::from("Resource"));
    assert_eq!(pebble.dynamic_class_name().as_str(), "Pebble");
}

#[itest]
fn base_from_init_fn() {
    let mut pebble = Gd::from_init_fn(|base| Pebble { base, weight: 12 });
    pebble.set_name("flint");

    assert_eq!(pebble.bind().label(), "flint (12)");
}

#[itest]
fn base_mut_calls_engine_methods() {
    let mut pebble = Pebble::new_gd();
    pebble.bind_mut().rename("basalt");

    assert_eq!(pebble.get_name(), GString::from("basalt"));
    assert_eq!(pebble.bind().label(), "basalt (3)");
}

#[itest]
fn base_to_gd_points_to_same_object() {
    let pebble = Pebble::new_gd();
    let id = pebble.instance_id();

    let same = pebble.bind().to_gd();
    assert_eq!(same.instance_id(), id);
    assert_eq!(pebble.bind().base().instance_id(), id);
}

#[itest]
fn base_custom_field_name() {
    let mut cairn = Cairn::new_alloc();
    cairn.bind_mut().stones.extend([1, 2, 3]);

    let root_id = cairn.bind().base().instance_id();
    assert_eq!(root_id, cairn.instance_id());
    assert_eq!(cairn.bind().stones.len(), 3);

    cairn.free();
}

#[itest]
fn base_upcast_user_object() {
    let pebble = Pebble::new_gd();
    let id = pebble.instance_id();

    let object = pebble.upcast::<Object>();
    assert_eq!(object.instance_id(), id);

    let pebble = object.cast::<Pebble>();
    assert_eq!(pebble.bind().weight, 3);

    // A plain engine object is not a user instance.
    assert!(Resource::new_gd().try_cast::<Pebble>().is_err());
}

#[itest]
fn base_double_bind_mut_panics() {
    let mut pebble = Pebble::new_gd();
    let mut copy = pebble.clone();

    let instance = format!("Pebble (#{})", pebble.instance_id());
    let _guard = pebble.bind_mut();
    expect_panic_containing("second bind_mut() on same instance", &["bind_mut() on", &instance], move || {
        let _second = copy.bind_mut();
    });
}

#[itest]
fn base_bind_while_bind_mut_panics() {
    let mut pebble = Pebble::new_gd();
    let copy = pebble.clone();
    let instance = format!("Pebble (#{})", pebble.instance_id());

    let mut guard = pebble.bind_mut();
    guard.weight = 7;
    expect_panic_containing("bind() while bind_mut() is held", &["bind() on", &instance], move || {
        let _shared = copy.bind();
    });
    drop(guard);

    assert_eq!(pebble.bind().weight, 7);
}

#[itest]
fn base_free_while_bound_panics() {
    let cairn = Cairn::new_alloc();
    let copy = cairn.clone();

    {
        let _guard = cairn.bind();
        expect_panic("free() while bound", move || copy.free());
    }

    cairn.free();
}
