/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Properties declared with `#[var]` on fields of user classes.

use crate::builtin::StringName;
use crate::meta::{GodotConvert, GodotType, PropertyInfo, PropertyUsageFlags};
use crate::obj::GodotClass;
use crate::sys;

/// Registers property `name` of class `C`, backed by the already registered methods `getter` and `setter`.
///
/// An empty `setter` makes the property read-only. Plain `#[var]` properties are reachable through `Object.get()`,
/// `Object.set()` and GDScript member syntax, but are neither stored nor shown in the inspector.
pub fn register_var<C: GodotClass, T: GodotConvert>(name: &str, getter: &str, setter: &str) {
    let info = PropertyInfo {
        usage: PropertyUsageFlags::NONE,
        ..T::Via::property_info(name)
    };

    register_property(C::class_name().string_sys(), &info, getter, setter);
    sys::out!("Register property: {}::{name} (get {getter:?}, set {setter:?})", C::class_name());
}

fn register_property(
    class_name: sys::GDExtensionConstStringNamePtr,
    info: &PropertyInfo,
    getter: &str,
    setter: &str,
) {
    let getter = StringName::from(getter);
    let setter = StringName::from(setter);
    let info_sys = info.property_sys();

    // SAFETY: all pointers are valid for the duration of the call; the engine copies what it keeps.
    unsafe {
        sys::interface_fn!(classdb_register_extension_class_property)(
            sys::get_library(),
            class_name,
            &info_sys,
            setter.string_sys(),
            getter.string_sys(),
        );
    }
}
