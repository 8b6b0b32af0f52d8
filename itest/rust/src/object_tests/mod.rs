/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod base_test;
mod init_level_test;
mod object_test;
mod ownership_test;
mod virtual_methods_test;

pub use init_level_test::{record_deinit_level, record_init_level};
