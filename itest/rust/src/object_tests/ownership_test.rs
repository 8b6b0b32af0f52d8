/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{GString, Variant};
use gdbind::classes::{Material, Node, RefCounted, Resource, Sky};
use gdbind::meta::ToGodot;
use gdbind::obj::{Gd, NewAlloc, NewGd};

use crate::framework::itest;

#[itest]
fn refcount_clone_and_drop() {
    let obj = RefCounted::new_gd();
    assert_eq!(obj.get_reference_count(), 1);

    let copy = obj.clone();
    assert_eq!(obj.get_reference_count(), 2);

    drop(copy);
    assert_eq!(obj.get_reference_count(), 1);
}

#[itest]
fn refcount_last_handle_destroys() {
    let obj = RefCounted::new_gd();
    let id = obj.instance_id();

    drop(obj);
    assert!(!id.lookup_validity());
}

#[itest]
fn refcount_upcast_keeps_count() {
    let sky = Sky::new_gd();
    let id = sky.instance_id();

    let res = sky.upcast::<Resource>();
    assert_eq!(res.get_reference_count(), 1);

    let sky = res.cast::<Sky>();
    assert_eq!(sky.get_reference_count(), 1);
    assert_eq!(sky.instance_id(), id);
}

#[itest]
fn refcount_returned_object_is_owned() {
    let mut sky = Sky::new_gd();
    sky.set_name("dusk");

    // Objects returned by engine methods hold their own reference.
    let copy = sky.duplicate().expect("Sky can be duplicated");
    assert_eq!(copy.get_reference_count(), 1);
    assert_ne!(copy.instance_id(), sky.instance_id());

    let copy = copy.try_cast::<Sky>().expect("duplicate of Sky is a Sky");
    assert_eq!(copy.get_name(), GString::from("dusk"));

    let id = copy.instance_id();
    drop(copy);
    assert!(!id.lookup_validity());

    sky.set_material(None::<&Gd<Material>>);
    assert!(sky.get_material().is_none());
}

#[itest]
fn refcount_through_variant() {
    let res = Resource::new_gd();

    let variant = res.to_variant();
    assert_eq!(res.get_reference_count(), 2);

    let back = variant.to::<Gd<Resource>>();
    assert_eq!(res.get_reference_count(), 3);
    assert_eq!(back, res);

    drop(variant);
    drop(back);
    assert_eq!(res.get_reference_count(), 1);
}

#[itest]
fn string_return_is_owned() {
    let mut res = Resource::new_gd();
    res.set_name("granite");

    // Every call transfers a fresh string; dropping one must not affect the next.
    let first = res.get_name();
    drop(first);
    let second = res.get_name();
    assert_eq!(second, GString::from("granite"));
}

#[itest]
fn manual_object_survives_handle_drop() {
    let node = Node::new_alloc();
    let id = node.instance_id();

    drop(node);
    assert!(id.lookup_validity());

    Gd::<Node>::from_instance_id(id).free();
}

#[itest]
fn nil_variant_is_not_an_object() {
    assert!(Variant::nil().try_to::<Gd<Resource>>().is_err());
}
