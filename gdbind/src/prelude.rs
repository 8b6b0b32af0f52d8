/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub use super::builtin::{
    Color, GString, StringName, Variant, VariantArray, VariantType, Vector2, Vector2i, Vector3,
};
pub use super::classes::{
    Engine, FastNoiseLite, IMaterial, INode, INoise, IObject, IRefCounted, IResource, Material,
    Node, Noise, Object, ObjectNotification, RefCounted, Resource, Sky, TileSet,
};
pub use super::init::{gdextension, EditorRunBehavior, ExtensionLibrary, InitLevel};
pub use super::log::{godot_error, godot_print, godot_script_error, godot_warn};
pub use super::meta::error::ConvertError;
pub use super::meta::{FromGodot, GodotConvert, ToGodot};
pub use super::obj::{Base, Gd, GdMut, GdRef, GodotClass, Inherits, InstanceId};

// Re-export macros.
pub use super::register::{godot_api, GodotClass};

// Make trait methods available.
#[rustfmt::skip] // One per line.
mod trait_reexports {
    pub use crate::obj::NewAlloc as _; // new_alloc()
    pub use crate::obj::NewGd as _; // new_gd()
    pub use crate::obj::Singleton as _; // singleton()
    pub use crate::obj::WithBaseField as _; // base(), base_mut(), to_gd()
}

pub use trait_reexports::*;
