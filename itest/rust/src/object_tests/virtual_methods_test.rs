/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::GString;
use gdbind::classes::{
    IMaterial, INode, IRefCounted, IResource, Material, Node, ObjectNotification, RefCounted,
    Resource, ShaderMode,
};
use gdbind::obj::cap::ImplementsGodotVirtual;
use gdbind::obj::{Base, Gd, NewAlloc, NewGd, WithBaseField};
use gdbind::register::{godot_api, GodotClass};

use crate::framework::{itest, TestContext};

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Test classes

#[derive(GodotClass)]
#[class(base = Node)]
struct Watchtower {
    base: Base<Node>,
    entered: u32,
    exited: u32,
    ready_calls: u32,
    ticks: f64,
}

#[godot_api]
impl INode for Watchtower {
    fn init(base: Base<Node>) -> Self {
        Self {
            base,
            entered: 0,
            exited: 0,
            ready_calls: 0,
            ticks: 0.0,
        }
    }

    fn ready(&mut self) {
        self.ready_calls += 1;
    }

    fn process(&mut self, delta: f64) {
        self.ticks += delta;
    }

    fn enter_tree(&mut self) {
        self.entered += 1;
    }

    fn exit_tree(&mut self) {
        self.exited += 1;
    }
}

#[derive(GodotClass)]
#[class(init, base = Resource)]
struct Gemstone {
    base: Base<Resource>,
    #[init(val = 5)]
    carats: i32,
    setups: u32,
}

#[godot_api]
impl IResource for Gemstone {
    fn to_string(&self) -> GString {
        let name = self.base().get_name();
        GString::from(format!("Gemstone({name}, {} ct)", self.carats))
    }

    fn setup_local_to_scene(&mut self) {
        self.setups += 1;
    }
}

#[derive(GodotClass)]
#[class(init)]
struct Listener {
    received: Vec<i32>,
}

#[godot_api]
impl IRefCounted for Listener {
    fn on_notification(&mut self, what: ObjectNotification) {
        self.received.push(what.ord());
    }
}

#[derive(GodotClass)]
#[class(init, base = Material)]
struct Hologram {
    base: Base<Material>,
}

#[godot_api]
impl IMaterial for Hologram {
    fn get_shader_mode(&self) -> ShaderMode {
        ShaderMode::CANVAS_ITEM
    }

    fn can_do_next_pass(&self) -> bool {
        false
    }

    fn can_use_render_priority(&self) -> bool {
        true
    }
}

/// Only constructible from Rust.
#[derive(GodotClass)]
#[class(no_init)]
struct Ticket {
    serial: u64,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Tests

#[itest]
fn virtual_tree_callbacks(ctx: &TestContext) {
    let mut tree = ctx.scene_tree.clone();
    let tower = Watchtower::new_alloc();
    let as_node = tower.clone().upcast::<Node>();

    tree.add_child(&as_node);
    {
        let tower = tower.bind();
        assert_eq!(tower.entered, 1);
        assert_eq!(tower.ready_calls, 1);
        assert_eq!(tower.exited, 0);
    }
    assert_eq!(as_node.get_parent(), Some(tree.clone()));

    tree.remove_child(&as_node);
    assert_eq!(tower.bind().exited, 1);
    assert!(as_node.get_parent().is_none());

    // Ready is only sent once per node, unless explicitly requested again.
    tree.add_child(&as_node);
    assert_eq!(tower.bind().entered, 2);
    assert_eq!(tower.bind().ready_calls, 1);

    tree.remove_child(&as_node);
    tower.free();
}

#[itest]
fn virtual_process_not_called_synchronously(ctx: &TestContext) {
    let mut tree = ctx.scene_tree.clone();
    let tower = Watchtower::new_alloc();

    tree.add_child(&tower.clone().upcast());
    assert_eq!(tower.bind().ticks, 0.0);

    tree.remove_child(&tower.clone().upcast());
    tower.free();
}

#[itest]
fn virtual_children_of_user_node(ctx: &TestContext) {
    let mut tree = ctx.scene_tree.clone();
    let mut outer = Watchtower::new_alloc();
    let inner = Watchtower::new_alloc();

    outer.add_child(&inner.clone().upcast());
    assert_eq!(inner.bind().entered, 0);

    tree.add_child(&outer.clone().upcast());
    assert_eq!(inner.bind().entered, 1);
    assert_eq!(inner.bind().ready_calls, 1);
    assert_eq!(outer.get_child_count(), 1);

    tree.remove_child(&outer.clone().upcast());
    assert_eq!(inner.bind().exited, 1);

    // Freeing a parent frees its children.
    let inner_id = inner.instance_id();
    outer.free();
    assert!(!inner_id.lookup_validity());
}

#[itest]
fn virtual_to_string_override() {
    let mut gem = Gemstone::new_gd();
    gem.set_name("opal");

    assert_eq!(gem.to_string(), "Gemstone(opal, 5 ct)");
    assert_eq!(gem.upcast::<Resource>().to_string(), "Gemstone(opal, 5 ct)");
}

#[itest]
fn virtual_to_string_default() {
    let ticket = Gd::from_object(Ticket { serial: 17 });
    let text = ticket.to_string();

    assert!(text.contains("Ticket"), "{text}");
    assert_eq!(ticket.bind().serial, 17);
}

#[itest]
fn virtual_on_notification() {
    let mut listener = Listener::new_gd();
    listener.notify(ObjectNotification::from_ord(4242));
    listener.notify(ObjectNotification::RESOURCE_CHANGED);

    let received = listener.bind().received.clone();
    assert!(received.ends_with(&[4242, 30]), "{received:?}");
}

#[itest]
fn virtual_material_callbacks() {
    let hologram = Hologram::new_gd();

    let bound = hologram.bind();
    assert_eq!(bound.get_shader_mode(), ShaderMode::CANVAS_ITEM);
    assert!(!bound.can_do_next_pass());
    assert!(bound.can_use_render_priority());
}

#[itest]
fn virtual_material_engine_methods() {
    let mut hologram = Hologram::new_gd();
    hologram.set_render_priority(4);
    assert_eq!(hologram.get_render_priority(), 4);

    let overlay = Hologram::new_gd().upcast::<Material>();
    let mut material = hologram.upcast::<Material>();
    material.set_next_pass(Some(&overlay));
    assert_eq!(
        material.get_next_pass().map(|m| m.instance_id()),
        Some(overlay.instance_id())
    );

    material.set_next_pass(None);
    assert!(material.get_next_pass().is_none());
}

#[itest]
fn virtual_dispatch_table() {
    assert!(Watchtower::__virtual_call("_ready").is_some());
    assert!(Watchtower::__virtual_call("_process").is_some());
    assert!(Watchtower::__virtual_call("_enter_tree").is_some());

    // Not overridden.
    assert!(Watchtower::__virtual_call("_physics_process").is_none());
    assert!(Watchtower::__virtual_call("_input").is_none());

    // Special callbacks are registered as capabilities, not as virtual methods.
    assert!(Gemstone::__virtual_call("_to_string").is_none());
    assert!(Gemstone::__virtual_call("_setup_local_to_scene").is_some());
    assert!(Hologram::__virtual_call("_get_shader_mode").is_some());
}

#[itest]
fn virtual_resource_setup_is_rust_callable() {
    let mut gem = Gemstone::new_gd();
    gem.bind_mut().setup_local_to_scene();
    assert_eq!(gem.bind().setups, 1);
}

#[itest]
fn virtual_no_init_class_from_rust() {
    let ticket = Gd::from_object(Ticket { serial: 99 });
    let refcounted = ticket.clone().upcast::<RefCounted>();

    assert_eq!(refcounted.get_reference_count(), 2);
    assert_eq!(ticket.bind().serial, 99);
}
