/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{GString, Variant, VariantArray};
use gdbind::meta::ToGodot;

use crate::framework::itest;

#[itest]
fn array_push_and_get() {
    let mut array = VariantArray::new();
    assert!(array.is_empty());

    array.push(7_i64);
    array.push("seven");
    array.push(Variant::nil());

    assert_eq!(array.len(), 3);
    assert_eq!(array.get(0).map(|v| v.to::<i64>()), Some(7));
    assert_eq!(array.get(1).map(|v| v.to::<GString>()), Some(GString::from("seven")));
    assert!(array.get(2).is_some_and(|v| v.is_nil()));
    assert!(array.get(3).is_none());
}

#[itest]
fn array_from_iterator() {
    let array: VariantArray = (1..=4_i64).collect();
    let values: Vec<i64> = array.iter_shared().map(|v| v.to::<i64>()).collect();

    assert_eq!(values, vec![1, 2, 3, 4]);
}

#[itest]
fn array_clone_shares_storage() {
    let mut array = VariantArray::new();
    let alias = array.clone();

    array.push(true);
    assert_eq!(alias.len(), 1);
}

#[itest]
fn array_in_variant() {
    let array: VariantArray = ["a", "b"].into_iter().collect();

    let variant = array.to_variant();
    let back = variant.to::<VariantArray>();
    assert_eq!(back.len(), 2);
    assert_eq!(variant.stringify(), GString::from("[\"a\", \"b\"]"));
}
