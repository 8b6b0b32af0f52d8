/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashSet;
use std::fmt;

use sys::Global;

use crate::builtin::{GString, StringName};
use crate::sys;

// Names created at runtime are leaked once and reused, so that `ClassName` stays `Copy`.
static DYNAMIC_NAMES: Global<HashSet<&'static str>> = Global::default();

/// Name of a class registered with Godot.
///
/// Holds the Godot name, not necessarily the Rust name. Very cheap to copy: the text is either a literal or an
/// interned string that lives as long as the library.
///
/// Engine-side `StringName`s for class names are cached in the binding's string cache and created on first use.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ClassName {
    name: &'static str,
}

impl ClassName {
    /// Class name from a string literal, as emitted by the class macros.
    #[doc(hidden)]
    pub const fn from_static(name: &'static str) -> Self {
        Self { name }
    }

    /// Class name from a runtime string. Each distinct name is allocated only once.
    pub fn new_dynamic(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut names = DYNAMIC_NAMES.lock();

        let interned = match names.get(name.as_str()) {
            Some(&existing) => existing,
            None => {
                let leaked: &'static str = Box::leak(name.into_boxed_str());
                names.insert(leaked);
                leaked
            }
        };

        Self { name: interned }
    }

    /// Placeholder for "no class", used in property infos of non-object types.
    #[doc(hidden)]
    pub const fn none() -> Self {
        Self { name: "" }
    }

    #[doc(hidden)]
    pub fn is_none(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns the class name as a string slice with static storage duration.
    pub fn as_str(&self) -> &'static str {
        self.name
    }

    /// Converts the class name to a `GString`.
    pub fn to_gstring(&self) -> GString {
        GString::from(self.name)
    }

    /// Converts the class name to a `StringName`.
    pub fn to_string_name(&self) -> StringName {
        StringName::from(self.name)
    }

    /// Pointer to a cached engine `StringName`, valid until the library is deinitialized.
    #[doc(hidden)]
    pub fn string_sys(&self) -> sys::GDExtensionConstStringNamePtr {
        sys::with_string_cache(|cache| cache.fetch(self.name)) as sys::GDExtensionConstStringNamePtr
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "ClassName(none)")
        } else {
            write!(f, "ClassName({:?})", self.name)
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_names_are_interned() {
        let a = ClassName::new_dynamic("GeneratedSky");
        let b = ClassName::new_dynamic(String::from("GeneratedSky"));

        assert_eq!(a, b);
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
    }

    #[test]
    fn static_and_dynamic_compare_by_text() {
        let static_name = ClassName::from_static("TileSet");
        let dynamic_name = ClassName::new_dynamic("TileSet");

        assert_eq!(static_name, dynamic_name);
        assert_eq!(static_name.to_string(), "TileSet");
    }

    #[test]
    fn none_is_empty() {
        assert!(ClassName::none().is_none());
        assert!(!ClassName::from_static("Object").is_none());
        assert_eq!(format!("{:?}", ClassName::none()), "ClassName(none)");
        assert_eq!(format!("{:?}", ClassName::from_static("Noise")), r#"ClassName("Noise")"#);
    }
}
