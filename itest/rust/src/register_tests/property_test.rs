/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{GString, StringName, Variant};
use gdbind::meta::ToGodot;
use gdbind::obj::{Gd, NewGd};
use gdbind::register::{godot_api, GodotClass};

use crate::framework::itest;

#[derive(GodotClass)]
#[class(init)]
struct Thermostat {
    #[init(val = 21)]
    #[var]
    target: i64,

    #[var(get)]
    readings: i32,

    #[var(get = current_mode, set = switch_mode)]
    mode: i64,

    #[var]
    label: GString,

    switches: u32,
}

#[godot_api]
impl Thermostat {
    #[func]
    fn current_mode(&self) -> i64 {
        self.mode
    }

    #[func]
    fn switch_mode(&mut self, mode: i64) {
        self.mode = mode.clamp(0, 2);
        self.switches += 1;
    }
}

fn get(obj: &Gd<Thermostat>, property: &str) -> Variant {
    obj.get(&StringName::from(property))
}

fn set(obj: &mut Gd<Thermostat>, property: &str, value: Variant) {
    obj.set(&StringName::from(property), &value);
}

fn has_method(obj: &Gd<Thermostat>, method: &str) -> bool {
    obj.has_method(&StringName::from(method))
}

#[itest]
fn property_generated_accessors() {
    let mut thermostat = Thermostat::new_gd();

    assert!(has_method(&thermostat, "get_target"));
    assert!(has_method(&thermostat, "set_target"));
    assert_eq!(get(&thermostat, "target").to::<i64>(), 21);

    set(&mut thermostat, "target", 25_i64.to_variant());
    assert_eq!(thermostat.bind().target, 25);
    assert_eq!(get(&thermostat, "target").to::<i64>(), 25);
}

#[itest]
fn property_read_only() {
    let mut thermostat = Thermostat::new_gd();
    thermostat.bind_mut().readings = 3;

    assert!(has_method(&thermostat, "get_readings"));
    assert!(!has_method(&thermostat, "set_readings"));
    assert_eq!(get(&thermostat, "readings").to::<i64>(), 3);

    // Ignored by the engine: the property has no setter.
    set(&mut thermostat, "readings", 99_i64.to_variant());
    assert_eq!(thermostat.bind().readings, 3);
}

#[itest]
fn property_custom_accessors() {
    let mut thermostat = Thermostat::new_gd();

    // No generated accessors next to the custom ones.
    assert!(!has_method(&thermostat, "get_mode"));
    assert!(!has_method(&thermostat, "set_mode"));

    set(&mut thermostat, "mode", 7_i64.to_variant());
    assert_eq!(thermostat.bind().mode, 2);
    assert_eq!(thermostat.bind().switches, 1);
    assert_eq!(get(&thermostat, "mode").to::<i64>(), 2);
}

#[itest]
fn property_string_type() {
    let mut thermostat = Thermostat::new_gd();
    assert_eq!(get(&thermostat, "label").to::<GString>(), GString::new());

    set(&mut thermostat, "label", "hallway".to_variant());
    assert_eq!(thermostat.bind().label, GString::from("hallway"));
}

#[itest]
fn property_plain_field_is_not_exposed() {
    let thermostat = Thermostat::new_gd();

    assert!(!has_method(&thermostat, "get_switches"));
    assert!(get(&thermostat, "switches").is_nil());
}
