/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::builtin::{GString, StringName, Variant};
use crate::classes::load_method_bind;
use crate::meta::error::{CallResult, ConvertError};
use crate::meta::{FromGodot, GodotConvert, Signature, ToGodot};
use crate::obj::InstanceId;
use crate::sys;

engine_class! {
    /// Root of the engine class hierarchy.
    ///
    /// A `Gd<Object>` may point to any object, reference-counted or not; which one is decided at runtime.
    pub struct Object: root;
    memory = MemManual, MemDynamic;
    init_level = Core;
    instantiable;
}

engine_methods! {
    impl Object {
        /// Name of the dynamic class of this object, e.g. `"FastNoiseLite"`.
        fn get_class(&self) -> GString = 201670096;

        /// Whether the object is of class `class` or derived from it.
        fn is_class(&self, class: &str) -> bool = 3927539163;

        fn get_instance_id(&self) -> InstanceId = 3905245786;

        /// Sets a property by name. Unknown properties are ignored by the engine.
        fn set(&mut self, property: &StringName, value: &Variant) = 3776071444;

        /// Reads a property by name; nil if there is no such property.
        fn get(&self, property: &StringName) -> Variant = 2760726917;

        fn has_method(&self, method: &StringName) -> bool = 2619796661;

        /// Sends the notification `what` to this object and all its classes, starting at `Object`.
        fn notify(&mut self, what: ObjectNotification) as notification = 4023243586, defaults(false);

        /// Engine string representation, which user classes may override through `to_string()` in their interface trait.
        #[allow(clippy::inherent_to_string)]
        fn to_string(&self) -> GString = 2841200299;
    }
}

impl Object {
    /// Calls a method by name with dynamically typed arguments.
    ///
    /// Returns an error if the method does not exist, the arguments do not fit, or the call itself failed.
    pub fn try_call(&mut self, method: &StringName, args: &[Variant]) -> CallResult<Variant> {
        static METHOD_BIND: sys::FnPtrCell = sys::FnPtrCell::new();
        let method_bind = load_method_bind(&METHOD_BIND, "Object", "call", 3400424181);

        // SAFETY: `call` takes the method name followed by varargs, and returns a variant.
        unsafe {
            Signature::<(&StringName,), Variant>::out_class_varcall(
                method_bind,
                "Object",
                "call",
                self.object_ptr,
                (method,),
                args,
            )
        }
    }

    /// ⚠️ Calls a method by name with dynamically typed arguments.
    ///
    /// # Panics
    /// If the call fails, see [`try_call()`][Self::try_call].
    pub fn call(&mut self, method: &StringName, args: &[Variant]) -> Variant {
        self.try_call(method, args)
            .unwrap_or_else(|err| panic!("{err}"))
    }
}

engine_interface! {
    /// Virtual methods of [`Object`], overridden with `#[godot_api] impl IObject for MyClass`.
    pub trait IObject {}
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Notification passed to `on_notification()` and sent with [`Object::notify()`].
///
/// Classes define their own notification constants, so every `i32` is a valid value.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ObjectNotification {
    ord: i32,
}

impl ObjectNotification {
    pub const POSTINITIALIZE: Self = Self::from_ord(0);
    pub const PREDELETE: Self = Self::from_ord(1);
    pub const EXTENSION_RELOADED: Self = Self::from_ord(2);

    // Node
    pub const ENTER_TREE: Self = Self::from_ord(10);
    pub const EXIT_TREE: Self = Self::from_ord(11);
    pub const READY: Self = Self::from_ord(13);
    pub const PAUSED: Self = Self::from_ord(14);
    pub const UNPAUSED: Self = Self::from_ord(15);
    pub const PHYSICS_PROCESS: Self = Self::from_ord(16);
    pub const PROCESS: Self = Self::from_ord(17);
    pub const PARENTED: Self = Self::from_ord(18);
    pub const UNPARENTED: Self = Self::from_ord(19);

    // Resource
    pub const RESOURCE_CHANGED: Self = Self::from_ord(30);

    pub const fn from_ord(ord: i32) -> Self {
        Self { ord }
    }

    pub const fn ord(self) -> i32 {
        self.ord
    }

    fn name(self) -> Option<&'static str> {
        let name = match self.ord {
            0 => "POSTINITIALIZE",
            1 => "PREDELETE",
            2 => "EXTENSION_RELOADED",
            10 => "ENTER_TREE",
            11 => "EXIT_TREE",
            13 => "READY",
            14 => "PAUSED",
            15 => "UNPAUSED",
            16 => "PHYSICS_PROCESS",
            17 => "PROCESS",
            18 => "PARENTED",
            19 => "UNPARENTED",
            30 => "RESOURCE_CHANGED",
            _ => return None,
        };

        Some(name)
    }
}

impl fmt::Debug for ObjectNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "ObjectNotification::{name}"),
            None => write!(f, "ObjectNotification({})", self.ord),
        }
    }
}

impl GodotConvert for ObjectNotification {
    type Via = i64;
}

impl ToGodot for ObjectNotification {
    fn to_godot(&self) -> Self::Via {
        self.ord as i64
    }
}

impl FromGodot for ObjectNotification {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        i32::try_from(via)
            .map(Self::from_ord)
            .map_err(|_| ConvertError::int_range::<i32>(via))
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_debug() {
        assert_eq!(
            format!("{:?}", ObjectNotification::READY),
            "ObjectNotification::READY"
        );
        assert_eq!(
            format!("{:?}", ObjectNotification::from_ord(2001)),
            "ObjectNotification(2001)"
        );
    }

    #[test]
    fn notification_accepts_any_i32() {
        assert_eq!(
            ObjectNotification::from_godot(17),
            ObjectNotification::PROCESS
        );
        assert_eq!(ObjectNotification::from_godot(-5).ord(), -5);
        assert!(ObjectNotification::try_from_godot(i64::MAX).is_err());
        assert_eq!(ObjectNotification::PREDELETE.to_godot(), 1);
    }
}
