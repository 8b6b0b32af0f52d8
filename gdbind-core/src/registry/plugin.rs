/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Records that the proc-macros add to the plugin registry, one per macro invocation.
//!
//! A class is usually described by three of them: the derive ([`ClassItem`]), the inherent `#[godot_api]` block
//! ([`MethodsItem`]) and the interface trait impl ([`VirtualsItem`]). [`register_classes`](super::class) merges them.

use std::ffi::c_void;
use std::fmt;

use crate::meta::ClassName;
use crate::obj::{cap, GodotClass};
use crate::registry::callbacks;
use crate::sys;
use crate::sys::InitLevel;

#[derive(Debug)]
pub struct ClassPlugin {
    pub(crate) class_name: ClassName,
    pub(crate) init_level: InitLevel,
    pub(crate) item: PluginItem,
}

impl ClassPlugin {
    pub fn new<T: GodotClass>(item: PluginItem) -> Self {
        Self {
            class_name: T::class_name(),
            init_level: T::INIT_LEVEL,
            item,
        }
    }
}

#[derive(Clone, Debug)]
pub enum PluginItem {
    /// From `#[derive(GodotClass)]`.
    Class(ClassItem),

    /// From `#[godot_api] impl MyClass`.
    Methods(MethodsItem),

    /// From `#[godot_api] impl IBase for MyClass`.
    Virtuals(VirtualsItem),
}

impl PluginItem {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Class(_) => "#[derive(GodotClass)]",
            Self::Methods(_) => "#[godot_api] impl",
            Self::Virtuals(_) => "#[godot_api] trait impl",
        }
    }
}

/// Registration step run once the class exists in ClassDB.
#[derive(Copy, Clone)]
pub struct RegisterFn(pub fn());

impl fmt::Debug for RegisterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegisterFn({:p})", self.0 as *const ())
    }
}

pub(crate) type CreateFn = unsafe extern "C" fn(*mut c_void) -> sys::GDExtensionObjectPtr;

pub(crate) type RecreateFn =
    unsafe extern "C" fn(*mut c_void, sys::GDExtensionObjectPtr) -> sys::GDExtensionClassInstancePtr;

pub(crate) type FreeFn = unsafe extern "C" fn(*mut c_void, sys::GDExtensionClassInstancePtr);

pub(crate) type RefCountFn = unsafe extern "C" fn(sys::GDExtensionClassInstancePtr);

pub(crate) type GetVirtualFn = unsafe extern "C" fn(
    *mut c_void,
    sys::GDExtensionConstStringNamePtr,
) -> sys::GDExtensionClassCallVirtual;

pub(crate) type ToStringFn = unsafe extern "C" fn(
    sys::GDExtensionClassInstancePtr,
    *mut sys::GDExtensionBool,
    sys::GDExtensionStringPtr,
);

pub(crate) type NotificationFn =
    unsafe extern "C" fn(sys::GDExtensionClassInstancePtr, i32, sys::GDExtensionBool);

/// A pair of constructors: fresh objects, and re-attaching after hot reload.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Constructor {
    pub create: CreateFn,
    pub recreate: RecreateFn,
}

impl Constructor {
    fn user_init<T: cap::GodotDefault>() -> Self {
        Self {
            create: callbacks::create::<T>,
            recreate: callbacks::recreate::<T>,
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Class declaration: base class, lifecycle callbacks and `#[var]` properties.
#[derive(Clone, Debug)]
pub struct ClassItem {
    pub(crate) base_class_name: ClassName,
    pub(crate) constructor: Option<Constructor>,
    pub(crate) free_fn: FreeFn,
    pub(crate) reference_fn: RefCountFn,
    pub(crate) unreference_fn: RefCountFn,
    pub(crate) register_properties: RegisterFn,
    pub(crate) is_tool: bool,
    pub(crate) is_instantiable: bool,
}

impl ClassItem {
    pub fn new<T: cap::ImplementsGodotExports>() -> Self {
        Self {
            base_class_name: T::Base::class_name(),
            constructor: None,
            free_fn: callbacks::free::<T>,
            reference_fn: callbacks::reference::<T>,
            unreference_fn: callbacks::unreference::<T>,
            register_properties: RegisterFn(T::__register_exports),
            is_tool: false,
            is_instantiable: false,
        }
    }

    /// Constructor generated by `#[class(init)]`.
    pub fn with_generated_init<T: cap::GodotDefault>(mut self) -> Self {
        self.constructor = Some(Constructor::user_init::<T>());
        self.is_instantiable = true;
        self
    }

    /// `init()` comes from the interface trait impl.
    pub fn with_user_init(mut self) -> Self {
        self.is_instantiable = true;
        self
    }

    /// `#[class(no_init)]`: the engine receives a constructor that never creates anything.
    pub fn with_no_init<T: GodotClass>(mut self) -> Self {
        self.constructor = Some(Constructor {
            create: callbacks::create_null::<T>,
            recreate: callbacks::recreate_null::<T>,
        });
        self
    }

    pub fn with_tool(mut self) -> Self {
        self.is_tool = true;
        self
    }
}

/// `#[func]` methods of one inherent impl.
#[derive(Clone, Debug)]
pub struct MethodsItem {
    pub(crate) register_methods: RegisterFn,
}

impl MethodsItem {
    pub fn new<T: cap::ImplementsGodotApi>() -> Self {
        Self {
            register_methods: RegisterFn(T::__register_methods),
        }
    }
}

/// Engine callbacks overridden in the interface trait impl.
#[derive(Clone, Debug)]
pub struct VirtualsItem {
    pub(crate) get_virtual_fn: GetVirtualFn,
    pub(crate) constructor: Option<Constructor>,
    pub(crate) to_string_fn: Option<ToStringFn>,
    pub(crate) notification_fn: Option<NotificationFn>,
}

impl VirtualsItem {
    pub fn new<T: cap::ImplementsGodotVirtual>() -> Self {
        Self {
            get_virtual_fn: callbacks::get_virtual::<T>,
            constructor: None,
            to_string_fn: None,
            notification_fn: None,
        }
    }

    pub fn with_init<T: cap::GodotDefault>(mut self) -> Self {
        self.constructor = Some(Constructor::user_init::<T>());
        self
    }

    pub fn with_to_string<T: cap::GodotToString>(mut self) -> Self {
        self.to_string_fn = Some(callbacks::to_string::<T>);
        self
    }

    pub fn with_on_notification<T: cap::GodotNotification>(mut self) -> Self {
        self.notification_fn = Some(callbacks::on_notification::<T>);
        self
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_kinds() {
        let methods = PluginItem::Methods(MethodsItem {
            register_methods: RegisterFn(|| {}),
        });
        assert_eq!(methods.kind(), "#[godot_api] impl");
    }

    #[test]
    fn register_fn_debug_is_address() {
        let text = format!("{:?}", RegisterFn(|| {}));
        assert!(text.starts_with("RegisterFn(0x"), "{text}");
    }
}
