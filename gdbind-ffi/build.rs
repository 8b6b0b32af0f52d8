/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR set by cargo"));

    gdbind_bindings::write_gdextension_headers(&out_dir.join("gdextension_interface.rs"));
    gdbind_bindings::write_version_constants(&out_dir.join("api_version.rs"));

    gdbind_bindings::emit_godot_version_cfg();
    gdbind_bindings::emit_checks();

    println!("cargo:rerun-if-changed=build.rs");
}
