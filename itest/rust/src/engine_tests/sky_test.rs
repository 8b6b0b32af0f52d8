/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::classes::{Material, ProcessMode, RadianceSize, Sky};
use gdbind::obj::{Gd, NewGd};

use crate::framework::itest;

#[itest]
fn sky_defaults() {
    let sky = Sky::new_gd();

    assert_eq!(sky.get_radiance_size(), RadianceSize::SIZE_256);
    assert_eq!(sky.get_process_mode(), ProcessMode::AUTOMATIC);
    assert!(sky.get_material().is_none());
}

#[itest]
fn sky_radiance_size_roundtrip() {
    let mut sky = Sky::new_gd();

    for &size in &[RadianceSize::SIZE_32, RadianceSize::SIZE_1024, RadianceSize::SIZE_2048] {
        sky.set_radiance_size(size);
        assert_eq!(sky.get_radiance_size(), size);
    }
}

#[itest]
fn sky_process_mode_roundtrip() {
    let mut sky = Sky::new_gd();

    sky.set_process_mode(ProcessMode::REALTIME);
    assert_eq!(sky.get_process_mode(), ProcessMode::REALTIME);

    sky.set_process_mode(ProcessMode::QUALITY);
    assert_eq!(sky.get_process_mode(), ProcessMode::QUALITY);
}

#[itest]
fn sky_clear_material() {
    let mut sky = Sky::new_gd();

    sky.set_material(None::<&Gd<Material>>);
    assert!(sky.get_material().is_none());
}
