/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! # Internal crate of [**gdbind**](https://docs.rs/gdbind)
//!
//! Contains the builtin types, the object model, engine classes with their method-bind call sites, and the class
//! registry. Use the `gdbind` facade instead of depending on this crate directly.

pub mod builtin;
pub mod classes;
pub mod init;
pub mod log;
pub mod meta;
pub mod obj;
pub mod registry;

mod storage;

#[doc(hidden)]
pub mod private;

pub use gdbind_ffi as sys;

#[doc(hidden)]
pub use sys::out;
