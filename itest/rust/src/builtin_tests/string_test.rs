/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{GString, StringName};

use crate::framework::itest;

#[itest]
fn string_conversion() {
    let string = GString::from("lava flow");
    assert_eq!(string.to_string(), "lava flow");
    assert_eq!(String::from(&string), "lava flow");
    assert_eq!(string.len(), 9);
}

#[itest]
fn string_unicode() {
    let string = GString::from("Grüße, 東京");
    assert_eq!(string.to_string(), "Grüße, 東京");

    // Length in characters, not bytes.
    assert_eq!(string.len(), 10);
}

#[itest]
fn string_clone_and_eq() {
    let first = GString::from("magma");
    let second = first.clone();
    drop(first);

    assert_eq!(second, GString::from("magma"));
    assert_ne!(second, GString::from("Magma"));
    assert!(GString::new().is_empty());
}

#[itest]
fn string_name_conversion() {
    let name = StringName::from("get_noise_2d");
    assert_eq!(name.to_string(), "get_noise_2d");
    assert_eq!(name, StringName::from(&GString::from("get_noise_2d")));
    assert!(!name.is_empty());
    assert!(StringName::default().is_empty());
}

#[itest]
fn string_name_to_gstring() {
    let name = StringName::from("RefCounted");
    assert_eq!(GString::from(&name), GString::from("RefCounted"));
}
