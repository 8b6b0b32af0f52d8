/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate as sys;

/// Step in the Godot initialization process.
///
/// Godot's initialization and deinitialization processes are split into multiple stages, like a stack. At each level,
/// a different amount of engine functionality is available. Deinitialization happens in reverse order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum InitLevel {
    /// First level loaded by Godot. Builtin types are available, classes are not.
    Core,

    /// Second level loaded by Godot. Only server classes and builtins are available.
    Servers,

    /// Third level loaded by Godot. Most classes are available.
    Scene,

    /// Fourth level loaded by Godot, only in the editor. All classes are available.
    Editor,
}

impl InitLevel {
    /// All levels in initialization order.
    pub const ALL: [Self; 4] = [Self::Core, Self::Servers, Self::Scene, Self::Editor];

    /// Converts the engine's level, `None` for values unknown to this crate.
    #[doc(hidden)]
    pub fn try_from_sys(level: sys::GDExtensionInitializationLevel) -> Option<Self> {
        let level = match level {
            sys::GDEXTENSION_INITIALIZATION_CORE => Self::Core,
            sys::GDEXTENSION_INITIALIZATION_SERVERS => Self::Servers,
            sys::GDEXTENSION_INITIALIZATION_SCENE => Self::Scene,
            sys::GDEXTENSION_INITIALIZATION_EDITOR => Self::Editor,
            _ => return None,
        };

        Some(level)
    }

    #[doc(hidden)]
    pub fn to_sys(self) -> sys::GDExtensionInitializationLevel {
        match self {
            Self::Core => sys::GDEXTENSION_INITIALIZATION_CORE,
            Self::Servers => sys::GDEXTENSION_INITIALIZATION_SERVERS,
            Self::Scene => sys::GDEXTENSION_INITIALIZATION_SCENE,
            Self::Editor => sys::GDEXTENSION_INITIALIZATION_EDITOR,
        }
    }

    /// Levels from `self` up to and including `max`, in initialization order.
    pub fn up_to(self, max: Self) -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter().filter(move |&level| level >= self && level <= max)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sys_round_trip() {
        for level in InitLevel::ALL {
            assert_eq!(InitLevel::try_from_sys(level.to_sys()), Some(level));
        }

        assert_eq!(InitLevel::try_from_sys(99 as sys::GDExtensionInitializationLevel), None);
    }

    #[test]
    fn levels_are_ordered() {
        let up: Vec<_> = InitLevel::Servers.up_to(InitLevel::Scene).collect();
        assert_eq!(up, [InitLevel::Servers, InitLevel::Scene]);

        let down: Vec<_> = InitLevel::Core.up_to(InitLevel::Editor).rev().collect();
        assert_eq!(down.first(), Some(&InitLevel::Editor));
        assert_eq!(down.last(), Some(&InitLevel::Core));
    }
}
