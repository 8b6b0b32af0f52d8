/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::StringName;
use gdbind::classes::Node;
use gdbind::obj::{Gd, NewAlloc};

use crate::framework::{itest, TestContext};

#[itest]
fn node_add_and_remove_children() {
    let mut parent = Node::new_alloc();
    let first = Node::new_alloc();
    let second = Node::new_alloc();

    parent.add_child(&first);
    parent.add_child(&second);
    assert_eq!(parent.get_child_count(), 2);
    assert_eq!(parent.get_child(0), Some(first.clone()));
    assert_eq!(parent.get_child(1), Some(second.clone()));
    assert_eq!(first.get_parent(), Some(parent.clone()));

    parent.remove_child(&first);
    assert_eq!(parent.get_child_count(), 1);
    assert_eq!(parent.get_child(0), Some(second.clone()));
    assert!(first.get_parent().is_none());

    first.free();
    parent.free();

    // Children are freed with their parent.
    assert!(!second.is_instance_valid());
}

#[itest]
fn node_children_get_unique_names() {
    let mut parent = Node::new_alloc();
    let first = Node::new_alloc();
    let second = Node::new_alloc();

    parent.add_child(&first);
    parent.add_child(&second);

    let first_name = first.get_name();
    assert!(!first_name.is_empty());
    assert_ne!(first_name, second.get_name());

    parent.free();
}

#[itest]
fn node_in_scene_tree(ctx: &TestContext) {
    let mut tree = ctx.scene_tree.clone();
    let count = tree.get_child_count();

    let node = Node::new_alloc();
    tree.add_child(&node);
    assert_eq!(tree.get_child_count(), count + 1);
    assert_eq!(node.get_parent().map(|p| p.instance_id()), Some(tree.instance_id()));

    tree.remove_child(&node);
    assert_eq!(tree.get_child_count(), count);
    node.free();
}

#[itest]
fn node_queue_free_is_deferred() {
    let mut node = Node::new_alloc();
    node.queue_free();

    // Deletion happens at the end of the frame.
    assert!(node.is_instance_valid());
    assert_eq!(node.get_name(), StringName::from(""));
}

#[itest]
fn node_get_parent_of_orphan() {
    let node: Gd<Node> = Node::new_alloc();
    assert!(node.get_parent().is_none());
    assert_eq!(node.get_child_count(), 0);
    node.free();
}
