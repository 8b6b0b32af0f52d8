/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::init::{gdextension, ExtensionLibrary, InitLevel};

mod builtin_tests;
mod engine_tests;
mod framework;
mod object_tests;
mod register_tests;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Entry point

#[gdextension(entry_symbol = itest_init)]
unsafe impl ExtensionLibrary for framework::IntegrationTests {
    fn on_level_init(level: InitLevel) {
        object_tests::record_init_level(level);
    }

    fn on_level_deinit(level: InitLevel) {
        object_tests::record_deinit_level(level);
    }
}
