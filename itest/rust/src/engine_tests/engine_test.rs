/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::classes::Engine;
use gdbind::obj::Singleton;

use crate::framework::itest;

#[itest]
fn engine_singleton_is_shared() {
    let first = Engine::singleton();
    let second = Engine::singleton();

    assert_eq!(first, second);
    assert!(first.is_instance_valid());
}

#[itest]
fn engine_physics_ticks_roundtrip() {
    let mut engine = Engine::singleton();
    let previous = engine.get_physics_ticks_per_second();
    assert!(previous > 0);

    engine.set_physics_ticks_per_second(previous * 2);
    assert_eq!(engine.get_physics_ticks_per_second(), previous * 2);

    engine.set_physics_ticks_per_second(previous);
    assert_eq!(engine.get_physics_ticks_per_second(), previous);
}

#[itest]
fn engine_runtime_state() {
    let engine = Engine::singleton();

    assert!(!engine.is_editor_hint());
    assert!(engine.get_frames_per_second() >= 0.0);
}

#[itest]
fn engine_singleton_outlives_handles() {
    let id = {
        let engine = Engine::singleton();
        engine.instance_id()
    };

    // Dropping singleton handles never destroys the engine object.
    assert!(id.lookup_validity());
    assert_eq!(Engine::singleton().instance_id(), id);
}
