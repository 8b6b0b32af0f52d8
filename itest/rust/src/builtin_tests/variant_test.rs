/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{Color, GString, Variant, VariantType, Vector2, Vector2i, Vector3};
use gdbind::classes::Resource;
use gdbind::meta::{FromGodot, ToGodot};
use gdbind::obj::{Gd, NewGd};

use crate::framework::itest;

fn roundtrip<T>(value: T)
where
    T: ToGodot + FromGodot + PartialEq + std::fmt::Debug,
{
    let variant = value.to_variant();
    let back = T::try_from_variant(&variant);
    assert_eq!(back.as_ref().ok(), Some(&value));
}

#[itest]
fn variant_nil() {
    let nil = Variant::nil();

    assert!(nil.is_nil());
    assert_eq!(nil.get_type(), VariantType::NIL);
    assert!(!nil.booleanize());
    assert_eq!(Variant::default().get_type(), VariantType::NIL);
}

#[itest]
fn variant_scalar_types() {
    assert_eq!(Variant::from(true).get_type(), VariantType::BOOL);
    assert_eq!(Variant::from(17_i64).get_type(), VariantType::INT);
    assert_eq!(Variant::from(17_u8).get_type(), VariantType::INT);
    assert_eq!(Variant::from(0.25_f32).get_type(), VariantType::FLOAT);
    assert_eq!(Variant::from("text").get_type(), VariantType::STRING);
}

#[itest]
fn variant_roundtrips() {
    roundtrip(true);
    roundtrip(-3_i32);
    roundtrip(i64::MAX);
    roundtrip(1.5_f64);
    roundtrip(String::from("obsidian"));
    roundtrip(GString::from("pumice"));
    roundtrip(Vector2::new(1.5, -2.0));
    roundtrip(Vector2i::new(16, 32));
    roundtrip(Vector3::new(0.0, 1.0, 2.0));
    roundtrip(Color::from_rgba(0.25, 0.5, 0.75, 1.0));
}

#[itest]
fn variant_conversion_errors() {
    let variant = "not a number".to_variant();
    assert!(variant.try_to::<i64>().is_err());
    assert!(variant.try_to::<Vector2>().is_err());

    // Integer out of range for the target type.
    let variant = 300_i64.to_variant();
    assert!(variant.try_to::<u8>().is_err());
    assert_eq!(variant.to::<i32>(), 300);
}

#[itest]
fn variant_stringify() {
    assert_eq!(Variant::from(42).stringify(), GString::from("42"));
    assert_eq!(Variant::from(true).stringify(), GString::from("true"));
    assert_eq!(Variant::nil().stringify(), GString::from("<null>"));
    assert_eq!(Variant::from(Vector2i::new(3, 4)).to_string(), "(3, 4)");
}

#[itest]
fn variant_booleanize() {
    assert!(Variant::from(1).booleanize());
    assert!(!Variant::from(0).booleanize());
    assert!(!Variant::from("").booleanize());
    assert!(Variant::from("x").booleanize());
}

#[itest]
fn variant_option_objects() {
    let none: Option<Gd<Resource>> = None;
    assert!(none.to_variant().is_nil());

    let res = Resource::new_gd();
    let variant = Some(res.clone()).to_variant();
    assert_eq!(variant.get_type(), VariantType::OBJECT);
    assert_eq!(variant.to::<Option<Gd<Resource>>>(), Some(res));
    assert_eq!(Variant::nil().to::<Option<Gd<Resource>>>(), None);
}
