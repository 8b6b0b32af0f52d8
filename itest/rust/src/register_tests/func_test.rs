/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{GString, StringName, Variant};
use gdbind::classes::{Node, Object};
use gdbind::meta::ToGodot;
use gdbind::obj::{Gd, NewAlloc, NewGd};
use gdbind::register::{godot_api, GodotClass};

use crate::framework::{expect_panic, itest};

#[derive(GodotClass)]
#[class(init)]
struct Abacus {
    beads: Vec<i64>,
}

#[godot_api]
impl Abacus {
    #[func]
    fn add(&self, a: i64, b: i64) -> i64 {
        a + b
    }

    #[func]
    fn push(&mut self, bead: i64) {
        self.beads.push(bead);
    }

    #[func(rename = total_sum)]
    fn sum(&self) -> i64 {
        self.beads.iter().sum()
    }

    #[func]
    fn describe(&self, label: GString, scale: f64) -> GString {
        GString::from(format!("{label}: {}", self.beads.len() as f64 * scale))
    }

    #[func]
    fn counting_board(rows: i32) -> Gd<Node> {
        let mut board = Node::new_alloc();
        for _ in 0..rows {
            board.add_child(&Node::new_alloc());
        }
        board
    }

    #[func]
    fn first_child(&self, node: Gd<Node>) -> Option<Gd<Node>> {
        if node.get_child_count() == 0 {
            return None;
        }
        node.get_child(0)
    }

    #[func]
    fn jam(&self) {
        panic!("beads are stuck");
    }

    #[func]
    fn ignore(&self, _: i64, _unused: bool) {}

    // Not registered.
    fn bead_count(&self) -> usize {
        self.beads.len()
    }
}

fn call(obj: &mut Gd<Abacus>, method: &str, args: &[Variant]) -> Variant {
    obj.upcast_mut::<Object>().call(&StringName::from(method), args)
}

#[itest]
fn func_call_by_name() {
    let mut abacus = Abacus::new_gd();

    let result = call(&mut abacus, "add", &[3_i64.to_variant(), 4_i64.to_variant()]);
    assert_eq!(result.to::<i64>(), 7);
}

#[itest]
fn func_mut_receiver_changes_state() {
    let mut abacus = Abacus::new_gd();

    call(&mut abacus, "push", &[10_i64.to_variant()]);
    call(&mut abacus, "push", &[32_i64.to_variant()]);

    assert_eq!(abacus.bind().bead_count(), 2);
    assert_eq!(abacus.bind().beads, vec![10, 32]);
}

#[itest]
fn func_renamed() {
    let mut abacus = Abacus::new_gd();
    abacus.bind_mut().beads.extend([1, 2, 3]);

    assert!(abacus.has_method(&StringName::from("total_sum")));
    assert!(!abacus.has_method(&StringName::from("sum")));

    let result = call(&mut abacus, "total_sum", &[]);
    assert_eq!(result.to::<i64>(), 6);
}

#[itest]
fn func_string_and_float_params() {
    let mut abacus = Abacus::new_gd();
    abacus.bind_mut().beads.extend([1, 1, 1, 1]);

    let result = call(&mut abacus, "describe", &["rows".to_variant(), 0.5_f64.to_variant()]);
    assert_eq!(result.to::<GString>(), GString::from("rows: 2"));
}

#[itest]
fn func_static() {
    let mut abacus = Abacus::new_gd();

    let board = call(&mut abacus, "counting_board", &[3_i64.to_variant()]).to::<Gd<Node>>();
    assert_eq!(board.get_child_count(), 3);
    board.free();
}

#[itest]
fn func_object_params_and_returns() {
    let mut abacus = Abacus::new_gd();
    let mut parent = Node::new_alloc();
    let child = Node::new_alloc();
    parent.add_child(&child);

    let result = call(&mut abacus, "first_child", &[parent.to_variant()]);
    assert_eq!(result.to::<Option<Gd<Node>>>(), Some(child));

    let empty = Node::new_alloc();
    let result = call(&mut abacus, "first_child", &[empty.to_variant()]);
    assert!(result.is_nil());

    empty.free();
    parent.free();
}

#[itest]
fn func_unnamed_params() {
    let mut abacus = Abacus::new_gd();

    let result = call(&mut abacus, "ignore", &[1_i64.to_variant(), true.to_variant()]);
    assert!(result.is_nil());
}

#[itest]
fn func_not_registered() {
    let abacus = Abacus::new_gd();

    assert!(abacus.has_method(&StringName::from("add")));
    assert!(!abacus.has_method(&StringName::from("bead_count")));
}

#[itest]
fn func_wrong_arg_count() {
    let mut abacus = Abacus::new_gd();
    let object = abacus.upcast_mut::<Object>();

    let err = object
        .try_call(&StringName::from("add"), &[1_i64.to_variant()])
        .expect_err("too few arguments");
    assert!(err.to_string().contains("add"), "{err}");

    let result = object.try_call(
        &StringName::from("add"),
        &[1_i64.to_variant(), 2_i64.to_variant(), 3_i64.to_variant()],
    );
    assert!(result.is_err());
}

#[itest]
fn func_wrong_arg_type() {
    let mut abacus = Abacus::new_gd();

    let result = abacus
        .upcast_mut::<Object>()
        .try_call(&StringName::from("add"), &["one".to_variant(), 2_i64.to_variant()]);
    assert!(result.is_err());
}

#[itest]
fn func_panic_becomes_call_error() {
    let mut abacus = Abacus::new_gd();

    let result = abacus
        .upcast_mut::<Object>()
        .try_call(&StringName::from("jam"), &[]);
    assert!(result.is_err());

    // The instance is not left bound after the panic.
    abacus.bind_mut().push(5);
    assert_eq!(abacus.bind().sum(), 5);
}

#[itest]
fn func_call_panics_on_error() {
    let mut abacus = Abacus::new_gd();

    expect_panic("call() with missing argument", || {
        call(&mut abacus, "push", &[]);
    });
}

#[itest]
fn func_direct_rust_calls() {
    let mut abacus = Abacus::new_gd();
    abacus.bind_mut().push(4);

    let bound = abacus.bind();
    assert_eq!(bound.add(2, 2), bound.sum());
    let board = Abacus::counting_board(0);
    assert_eq!(board.get_child_count(), 0);
    board.free();
}
