/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{GString, StringName, Variant};
use gdbind::classes::{Node, Object, ObjectNotification, RefCounted, Resource};
use gdbind::meta::ToGodot;
use gdbind::obj::{Gd, InstanceId, NewAlloc, NewGd};

use crate::framework::{expect_panic, itest};

#[itest]
fn object_construct_and_free() {
    let obj = Object::new_alloc();
    let id = obj.instance_id();

    assert!(obj.is_instance_valid());
    assert!(!id.is_ref_counted());

    obj.free();
    assert!(!id.lookup_validity());
}

#[itest]
fn object_class_queries() {
    let res = Resource::new_gd();

    assert_eq!(res.get_class(), GString::from("Resource"));
    assert!(res.is_class("RefCounted"));
    assert!(res.is_class("Object"));
    assert!(!res.is_class("Node"));
    assert_eq!(res.dynamic_class_name().as_str(), "Resource");
}

#[itest]
fn object_instance_id_roundtrip() {
    let node = Node::new_alloc();
    let id = node.instance_id();

    let found = Gd::<Node>::from_instance_id(id);
    assert_eq!(found, node);
    assert_eq!(node.get_instance_id(), id);

    // Wrong class behind the ID.
    assert!(Gd::<Resource>::try_from_instance_id(id).is_err());

    node.free();
    assert!(Gd::<Node>::try_from_instance_id(id).is_err());
}

#[itest]
fn object_instance_id_of_ref_counted() {
    let obj = RefCounted::new_gd();
    let id = obj.instance_id();

    assert!(id.is_ref_counted());
    assert_eq!(InstanceId::try_from_i64(id.to_i64()), Some(id));
}

#[itest]
fn object_upcast_downcast() {
    let node = Node::new_alloc();
    let id = node.instance_id();

    let obj = node.upcast::<Object>();
    assert_eq!(obj.instance_id(), id);

    let obj = match obj.try_cast::<Node>() {
        Ok(node) => node.upcast::<Object>(),
        Err(obj) => panic!("downcast to Node failed: {obj:?}"),
    };

    // Node is not a RefCounted; the failed cast hands back the original pointer.
    let obj = obj.try_cast::<RefCounted>().expect_err("Node is not RefCounted");
    obj.cast::<Node>().free();
}

#[itest]
fn object_dynamic_set_get() {
    let mut res = Resource::new_gd();
    let property = StringName::from("resource_name");

    res.set(&property, &"cliffs".to_variant());
    assert_eq!(res.get(&property).to::<String>(), "cliffs");
    assert_eq!(res.get_name(), GString::from("cliffs"));
}

#[itest]
fn object_dynamic_call() {
    let mut res = Resource::new_gd();
    res.set_name("stones");

    let name = res.call(&StringName::from("get_name"), &[]);
    assert_eq!(name.to::<GString>(), GString::from("stones"));

    assert!(res.has_method(&StringName::from("get_name")));
    assert!(!res.has_method(&StringName::from("no_such_method")));
}

#[itest]
fn object_dynamic_call_errors() {
    let mut res = Resource::new_gd();

    let err = res
        .try_call(&StringName::from("no_such_method"), &[])
        .expect_err("call to missing method must fail");
    assert!(err.to_string().contains("no_such_method"), "{err}");

    // Too many arguments for `get_name()`.
    let result = res.try_call(&StringName::from("get_name"), &[Variant::from(1)]);
    assert!(result.is_err());

    expect_panic("call() panics on error", || {
        res.call(&StringName::from("no_such_method"), &[]);
    });
}

#[itest]
fn object_to_string() {
    let node = Node::new_alloc();
    let text = node.to_string();

    assert!(text.to_string().contains("Node"), "{text}");
    node.free();
}

#[itest]
fn object_notify_unknown_notification() {
    // Notifications without receivers are ignored by the engine.
    let mut node = Node::new_alloc();
    node.notify(ObjectNotification::from_ord(9999));
    node.free();
}

#[itest]
fn object_free_twice_panics() {
    let node = Node::new_alloc();
    let copy = node.clone();
    node.free();

    expect_panic("free() on dead object", move || copy.free());
}

#[itest]
fn object_free_ref_counted_through_object_panics() {
    let obj = RefCounted::new_gd().upcast::<Object>();

    expect_panic("free() on RefCounted", move || obj.free());
}
