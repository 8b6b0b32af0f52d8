/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Maps the Godot class API to Rust.
//!
//! This module contains the following symbols:
//! * Classes: `Object`, `Node`, `FastNoiseLite`, etc.
//! * Interface traits: `IObject`, `INode`, etc. Implement them with `#[godot_api]` to override engine callbacks.
//! * Engine enums: `NoiseType`, `RadianceSize`, etc.
//!
//! Each engine method is a call site with its own cached method bind, looked up by class, name and hash on first use.

#[macro_use]
mod macros;

mod engine;
mod fast_noise_lite;
mod material;
mod node;
mod noise;
mod object;
mod ref_counted;
mod resource;
mod sky;
mod tile_set;

pub mod utilities;

pub use engine::Engine;
pub use fast_noise_lite::{FastNoiseLite, NoiseType};
pub use material::{IMaterial, Material, ShaderMode};
pub use node::{INode, Node};
pub use noise::{INoise, Noise};
pub use object::{IObject, Object, ObjectNotification};
pub use ref_counted::{IRefCounted, RefCounted};
pub use resource::{IResource, Resource};
pub use sky::{ProcessMode, RadianceSize, Sky};
pub use tile_set::TileSet;

use crate::meta::error::CallError;
use crate::meta::{CallContext, FromGodot, OutParamTuple, Signature};
use crate::sys;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Call sites

/// Loads the method bind of a call site, or panics with the failed lookup.
pub(crate) fn load_method_bind(
    cell: &sys::FnPtrCell,
    class_name: &'static str,
    method_name: &'static str,
    hash: i64,
) -> sys::GDExtensionMethodBindPtr {
    cell.class_method(class_name, method_name, hash)
        .unwrap_or_else(|err| {
            let call_ctx = CallContext::outbound(class_name, method_name);
            panic!("{}", CallError::failed_method_bind(&call_ctx, err))
        })
}

/// Ptrcall of an engine method through a call site.
///
/// # Safety
/// - `hash` must identify a method with parameters `P` and return type `R`.
/// - `object_ptr` must point to a live object of class `class_name` or derived.
pub(crate) unsafe fn class_ptrcall<P, R>(
    cell: &'static sys::FnPtrCell,
    class_name: &'static str,
    method_name: &'static str,
    hash: i64,
    object_ptr: sys::GDExtensionObjectPtr,
    args: P,
) -> R
where
    P: OutParamTuple,
    R: FromGodot,
{
    let method_bind = load_method_bind(cell, class_name, method_name, hash);
    Signature::<P, R>::out_class_ptrcall(method_bind, class_name, method_name, object_ptr, args)
}
