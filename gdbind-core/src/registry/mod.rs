/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Registration of user classes with the engine: class creation info, `#[func]` methods and the virtual-dispatch
//! table.
//!
//! Classes self-register through plugins emitted by the proc-macros; [`class::register_classes()`] collects them per
//! init level.

pub mod callbacks;
pub mod class;
pub mod method;
pub mod plugin;
pub mod property;
