/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! # Rust bindings for Godot 4
//!
//! This crate lets a Rust library be loaded by the Godot engine as a GDExtension. It provides:
//!
//! - [`builtin`]: value types shared with the engine, like [`GString`][builtin::GString],
//!   [`StringName`][builtin::StringName], [`Variant`][builtin::Variant] and vectors.
//! - [`classes`]: engine classes (`Object`, `RefCounted`, `Node`, `Resource`, `Material`, `Noise`, `FastNoiseLite`,
//!   `Sky`, `TileSet`, the `Engine` singleton), whose methods call into the engine through cached method binds.
//! - [`obj`]: the smart pointer [`Gd<T>`][obj::Gd] and the traits describing the class hierarchy and its memory
//!   management.
//! - [`register`]: proc-macros that expose user-defined classes, methods and engine callbacks to the engine.
//! - [`init`]: the entry point of the library.
//!
//! ## Ownership
//!
//! Objects are owned either by reference counting (classes inheriting `RefCounted`) or manually (all others).
//! `Gd<T>` encodes this in the type system: cloning a `Gd<Resource>` increments the engine's reference count, while a
//! `Gd<Node>` must eventually be [`free()`][obj::Gd::free]d or handed over to the scene tree.
//!
//! ## Example
//!
//! ```no_run
//! use gdbind::prelude::*;
//!
//! struct MyExtension;
//!
//! #[gdextension]
//! unsafe impl ExtensionLibrary for MyExtension {}
//!
//! #[derive(GodotClass)]
//! #[class(init, base = Node)]
//! struct Spinner {
//!     #[init(val = 1.0)]
//!     speed: f64,
//!     angle: f64,
//!     base: Base<Node>,
//! }
//!
//! #[godot_api]
//! impl INode for Spinner {
//!     fn process(&mut self, delta: f64) {
//!         self.angle += self.speed * delta;
//!     }
//! }
//!
//! #[godot_api]
//! impl Spinner {
//!     #[func]
//!     fn angle(&self) -> f64 {
//!         self.angle
//!     }
//! }
//! ```
//!
//! ## Cargo features
//!
//! * **`api-4-{minor}`**
//!
//!   Selects the GDExtension API version the library is compiled against. At most one may be enabled; by default the
//!   newest supported version is used. The library runs on the selected engine version and newer ones.
//!
//! * **`double-precision`**
//!
//!   Use `f64` instead of `f32` for the floating-point type `real`. Requires an engine built with the same flag.
//!
//! * **`experimental-threads`**
//!
//!   Lifts the restriction that engine objects may only be accessed from the main thread. Does not make any access
//!   thread-safe; synchronization remains the user's responsibility.
//!
//! * **`serde`**
//!
//!   Implements `Serialize` and `Deserialize` for value types like vectors and colors.

#[doc(inline)]
pub use gdbind_core::{builtin, classes, log, meta, obj};

#[doc(hidden)]
pub use gdbind_core::{private, sys};

/// Entry point and global init/shutdown of the library.
pub mod init {
    pub use gdbind_core::init::*;

    // Re-exports
    pub use gdbind_macros::gdextension;
}

/// Register/export Rust symbols to the engine: classes, methods and virtual callbacks.
pub mod register {
    pub use gdbind_macros::{godot_api, GodotClass};
}

/// Testing facilities (unstable).
#[doc(hidden)]
pub mod test {
    pub use gdbind_macros::itest;
}

/// Often-imported symbols.
pub mod prelude;
