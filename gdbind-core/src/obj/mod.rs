/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Types and traits related to objects.
//!
//! The most important symbols in this module are:
//! * [`GodotClass`], which is implemented for every class that Godot can work with (either engine- or user-provided).
//! * [`Gd`], a smart pointer that manages instances of Godot classes and the ownership of their memory.

mod base;
mod gd;
mod guards;
mod instance_id;
mod raw_gd;
mod traits;

pub use base::*;
pub use gd::*;
pub use guards::{BaseMut, BaseRef, GdMut, GdRef};
pub use instance_id::*;
pub use raw_gd::*;
pub use traits::*;

pub mod bounds;
pub use bounds::Bounds;

/// Resolves the type to which a `Gd<T>` dereferences.
///
/// - [`bounds::DeclEngine`]: for all engine-provided classes, `DerefTarget<T>` is `T`.
/// - [`bounds::DeclUser`]: for Rust-defined user classes, `DerefTarget<T>` is `T::Base`.
pub type GdDerefTarget<T> = <<T as Bounds>::Declarer as bounds::Declarer>::DerefTarget<T>;
