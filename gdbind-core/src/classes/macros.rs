/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Declarative building blocks for engine classes.

/// Declares an engine class: a handle-sized `#[repr(C)]` struct with its place in the class hierarchy.
///
/// All engine classes share the layout of `RawGd`, so upcasts and `Gd` dereferences are pointer casts.
macro_rules! engine_class {
    (
        $(#[$attr:meta])*
        pub struct $Class:ident: root;
        memory = $Memory:ident, $DynMemory:ident;
        init_level = $Level:ident;
        $construct:ident;
    ) => {
        engine_class!(@decl $(#[$attr])* $Class, crate::obj::NoBase, $Memory, $DynMemory, $Level, $construct);
    };

    (
        $(#[$attr:meta])*
        pub struct $Class:ident: $Base:ident $(: $Ancestor:ident)*;
        memory = $Memory:ident, $DynMemory:ident;
        init_level = $Level:ident;
        $construct:ident;
    ) => {
        engine_class!(@decl $(#[$attr])* $Class, $Base, $Memory, $DynMemory, $Level, $construct);

        impl std::ops::Deref for $Class {
            type Target = $Base;

            fn deref(&self) -> &Self::Target {
                // SAFETY: same layout, and every `$Class` object is a `$Base` object.
                unsafe { &*(self as *const Self as *const $Base) }
            }
        }

        impl std::ops::DerefMut for $Class {
            fn deref_mut(&mut self) -> &mut Self::Target {
                // SAFETY: see `Deref`.
                unsafe { &mut *(self as *mut Self as *mut $Base) }
            }
        }

        // SAFETY: listed classes are the superclasses of `$Class` in the engine.
        unsafe impl crate::obj::Inherits<$Base> for $Class {}
        $( unsafe impl crate::obj::Inherits<$Ancestor> for $Class {} )*
    };

    (@decl
        $(#[$attr:meta])*
        $Class:ident, $Base:ty, $Memory:ident, $DynMemory:ident, $Level:ident, $construct:ident
    ) => {
        $(#[$attr])*
        #[repr(C)]
        pub struct $Class {
            object_ptr: crate::sys::GDExtensionObjectPtr,
            #[allow(dead_code)]
            instance_id: Option<crate::obj::InstanceId>,
        }

        crate::sys::static_assert_eq_size!($Class, crate::obj::RawGd<$Class>);

        impl crate::obj::GodotClass for $Class {
            type Base = $Base;

            fn class_name() -> crate::meta::ClassName {
                crate::meta::ClassName::from_static(stringify!($Class))
            }

            const INIT_LEVEL: crate::sys::InitLevel = crate::sys::InitLevel::$Level;
        }

        // SAFETY: memory strategy as in the engine class database.
        unsafe impl crate::obj::Bounds for $Class {
            type Memory = crate::obj::bounds::$Memory;
            type DynMemory = crate::obj::bounds::$DynMemory;
            type Declarer = crate::obj::bounds::DeclEngine;
        }

        engine_class!(@construct $Class, $construct);
    };

    (@construct $Class:ident, instantiable) => {
        impl crate::obj::cap::GodotDefault for $Class {}
    };

    (@construct $Class:ident, not_instantiable) => {};
}

/// Declares engine methods as call sites.
///
/// Each method has its own `static` method bind, resolved on first call from class name, method name and hash.
/// `as name` maps to a differently named engine method; `defaults(..)` appends fixed trailing arguments.
macro_rules! engine_methods {
    (impl $Class:ident { $($methods:tt)* }) => {
        impl $Class {
            engine_methods!(@munch $Class; $($methods)*);
        }
    };

    (@munch $Class:ident;) => {};

    (@munch $Class:ident;
        $(#[$attr:meta])*
        fn $name:ident(&self $(, $param:ident: $Param:ty)*) $(-> $Ret:ty)? $(as $godot_name:ident)?
            = $hash:literal $(, defaults($($default:expr),+))?;
        $($rest:tt)*
    ) => {
        $(#[$attr])*
        pub fn $name(&self $(, $param: $Param)*) -> engine_methods!(@ret $($Ret)?) {
            static METHOD_BIND: crate::sys::FnPtrCell = crate::sys::FnPtrCell::new();

            // SAFETY: the hash identifies this exact signature; `self` is only reachable through a live handle.
            unsafe {
                crate::classes::class_ptrcall(
                    &METHOD_BIND,
                    stringify!($Class),
                    engine_methods!(@name $name $($godot_name)?),
                    $hash,
                    self.object_ptr,
                    ($($param,)* $($($default,)+)?),
                )
            }
        }

        engine_methods!(@munch $Class; $($rest)*);
    };

    (@munch $Class:ident;
        $(#[$attr:meta])*
        fn $name:ident(&mut self $(, $param:ident: $Param:ty)*) $(-> $Ret:ty)? $(as $godot_name:ident)?
            = $hash:literal $(, defaults($($default:expr),+))?;
        $($rest:tt)*
    ) => {
        $(#[$attr])*
        pub fn $name(&mut self $(, $param: $Param)*) -> engine_methods!(@ret $($Ret)?) {
            static METHOD_BIND: crate::sys::FnPtrCell = crate::sys::FnPtrCell::new();

            // SAFETY: the hash identifies this exact signature; `self` is only reachable through a live handle.
            unsafe {
                crate::classes::class_ptrcall(
                    &METHOD_BIND,
                    stringify!($Class),
                    engine_methods!(@name $name $($godot_name)?),
                    $hash,
                    self.object_ptr,
                    ($($param,)* $($($default,)+)?),
                )
            }
        }

        engine_methods!(@munch $Class; $($rest)*);
    };

    (@ret) => { () };
    (@ret $Ret:ty) => { $Ret };

    (@name $name:ident) => { stringify!($name) };
    (@name $name:ident $godot_name:ident) => { stringify!($godot_name) };
}

/// Declares an engine enum as a newtype over its ordinal, with named constants.
///
/// Crosses the boundary as `int`, like all engine enums.
macro_rules! engine_enum {
    (
        $(#[$attr:meta])*
        pub enum $Enum:ident {
            $( $(#[$variant_attr:meta])* $Variant:ident = $ord:literal, )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(transparent)]
        pub struct $Enum {
            ord: i32,
        }

        impl $Enum {
            $(
                $(#[$variant_attr])*
                pub const $Variant: Self = Self { ord: $ord };
            )*

            /// All enumerators, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$Variant ),* ];

            pub const fn ord(self) -> i32 {
                self.ord
            }

            /// Returns the enumerator with the given ordinal, if any.
            pub fn try_from_ord(ord: i32) -> Option<Self> {
                Self::ALL.iter().copied().find(|e| e.ord == ord)
            }

            /// Name of the enumerator as written in Rust, or `None` for ordinals without one.
            pub fn as_str(self) -> Option<&'static str> {
                match self.ord {
                    $( $ord => Some(stringify!($Variant)), )*
                    _ => None,
                }
            }
        }

        impl std::fmt::Debug for $Enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.as_str() {
                    Some(name) => write!(f, "{}::{name}", stringify!($Enum)),
                    None => write!(f, "{}({})", stringify!($Enum), self.ord),
                }
            }
        }

        impl crate::meta::GodotConvert for $Enum {
            type Via = i64;
        }

        impl crate::meta::ToGodot for $Enum {
            fn to_godot(&self) -> Self::Via {
                self.ord as i64
            }
        }

        impl crate::meta::FromGodot for $Enum {
            fn try_from_godot(via: Self::Via) -> Result<Self, crate::meta::error::ConvertError> {
                i32::try_from(via)
                    .ok()
                    .and_then(Self::try_from_ord)
                    .ok_or_else(|| {
                        crate::meta::error::ConvertError::unknown_enumerator(stringify!($Enum), via)
                    })
            }
        }
    };
}

/// Declares the interface trait of an engine class: the callbacks a user class can override.
///
/// Every trait carries `init`, `to_string` and `on_notification`, followed by the class' own virtual methods. Default
/// bodies are never called; only overridden methods end up in the virtual-dispatch table.
macro_rules! engine_interface {
    (
        $(#[$attr:meta])*
        pub trait $Trait:ident {
            $(
                $(#[$fn_attr:meta])*
                fn $name:ident($($params:tt)*) $(-> $Ret:ty)?;
            )*
        }
    ) => {
        $(#[$attr])*
        #[allow(unused_variables)]
        pub trait $Trait:
            crate::obj::GodotClass + crate::private::You_forgot_the_attribute__godot_api
        {
            /// Godot constructor, accepting an injected `base` object.
            ///
            /// `base` refers to the base instance of the class, which can either be stored in a `Base<T>` field or
            /// discarded. If the class has a `#[class(init)]` attribute, this method is generated and must not be
            /// overridden.
            fn init(base: crate::obj::Base<Self::Base>) -> Self {
                unreachable!("init is not dispatched")
            }

            /// String representation of the instance, used by `Display for Gd<T>` and `print()` in GDScript.
            fn to_string(&self) -> crate::builtin::GString {
                unreachable!("to_string is not dispatched")
            }

            /// Called when the object receives a notification, named `_notification` in the engine.
            ///
            /// To send notifications, use [`Object::notify()`][crate::classes::Object::notify].
            fn on_notification(&mut self, what: crate::classes::ObjectNotification) {
                unreachable!("on_notification is not dispatched")
            }

            $(
                $(#[$fn_attr])*
                fn $name($($params)*) $(-> $Ret)? {
                    unreachable!("{} is not dispatched", stringify!($name))
                }
            )*
        }
    };
}
