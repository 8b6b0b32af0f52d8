/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{GString, StringName};
use gdbind::classes::{Node, Object, RefCounted, Resource};
use gdbind::init::InitLevel;
use gdbind::meta::ToGodot;
use gdbind::obj::{Base, Gd, GodotClass as _, NewAlloc, NewGd};
use gdbind::private::registered_classes;
use gdbind::register::GodotClass;

use crate::framework::itest;

#[derive(GodotClass)]
#[class(init, base = Node)]
struct Lantern {
    base: Base<Node>,
}

#[derive(GodotClass)]
#[class(init, base = Resource, rename = LanternOil)]
struct Oil {
    #[init(val = 250)]
    millilitres: u32,
}

#[derive(GodotClass)]
#[class(init)]
struct Wick;

#[itest]
fn class_names_registered() {
    let lantern = Lantern::new_alloc();
    assert_eq!(lantern.get_class(), GString::from("Lantern"));
    assert!(lantern.is_class("Node"));
    assert!(lantern.is_class("Lantern"));
    lantern.free();

    let wick = Wick::new_gd();
    assert_eq!(wick.get_class(), GString::from("Wick"));
    assert!(wick.is_class("RefCounted"));
}

#[itest]
fn class_registered_at_level_of_base() {
    let core = registered_classes(InitLevel::Core);
    let scene = registered_classes(InitLevel::Scene);

    for name in [Oil::class_name(), Wick::class_name()] {
        assert!(core.contains(&name), "{name} missing from {core:?}");
    }
    assert!(scene.contains(&Lantern::class_name()), "Lantern missing from {scene:?}");
    assert!(!core.contains(&Lantern::class_name()));
}

#[itest]
fn class_renamed() {
    let oil = Oil::new_gd();

    assert_eq!(Oil::class_name().as_str(), "LanternOil");
    assert_eq!(oil.get_class(), GString::from("LanternOil"));
    assert!(oil.is_class("Resource"));
    assert_eq!(oil.bind().millilitres, 250);
}

#[itest]
fn class_memory_follows_base() {
    let wick = Wick::new_gd();
    let as_ref_counted: Gd<RefCounted> = wick.clone().upcast();
    assert_eq!(as_ref_counted.get_reference_count(), 2);

    let lantern = Lantern::new_alloc();
    let id = lantern.instance_id();
    assert!(!id.is_ref_counted());
    lantern.free();
    assert!(!id.lookup_validity());
}

#[itest]
fn class_properties_of_base() {
    let mut oil = Oil::new_gd();
    oil.set(&StringName::from("resource_name"), &"lamp".to_variant());

    let object: Gd<Object> = oil.upcast();
    assert_eq!(object.get(&StringName::from("resource_name")).to::<String>(), "lamp");
}
