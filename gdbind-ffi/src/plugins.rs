/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Distributed self-registration of "plugins" without central list.
//!
//! Each `plugin_add!` emits a static constructor that runs when the dynamic library is loaded, before any
//! GDExtension entry point. Registration order is unspecified.

// Note: code in this file is safe, however link_section attributes fall into the "unsafe" category for some lints.

/// Declare a global registry for plugins with a given name.
#[doc(hidden)]
#[macro_export]
macro_rules! plugin_registry {
    ($vis:vis $registry:ident: $Type:ty) => {
        $crate::paste::paste! {
            #[used]
            #[allow(non_upper_case_globals)]
            #[doc(hidden)]
            $vis static [< __gdbind_plugin_ $registry >]:
                std::sync::Mutex<Vec<$Type>> = std::sync::Mutex::new(Vec::new());
        }
    };
}

#[doc(hidden)]
#[macro_export]
#[cfg_attr(rustfmt, rustfmt::skip)]
// ^ skip: paste's [< >] syntax chokes fmt
macro_rules! plugin_add_inner {
    ($registry:ident; $plugin:expr; $( $path_tt:tt )* ) => {
        const _: () = {
            #[allow(non_upper_case_globals)]
            #[used]
            // Windows:
            #[cfg_attr(target_os = "windows", link_section = ".CRT$XCU")]
            // MacOS + iOS:
            #[cfg_attr(target_os = "ios", link_section = "__DATA,__mod_init_func")]
            #[cfg_attr(target_os = "macos", link_section = "__DATA,__mod_init_func")]
            // Linux, Android, BSD:
            #[cfg_attr(target_os = "android", link_section = ".init_array")]
            #[cfg_attr(target_os = "dragonfly", link_section = ".init_array")]
            #[cfg_attr(target_os = "freebsd", link_section = ".init_array")]
            #[cfg_attr(target_os = "linux", link_section = ".init_array")]
            #[cfg_attr(target_os = "netbsd", link_section = ".init_array")]
            #[cfg_attr(target_os = "openbsd", link_section = ".init_array")]
            static __init: extern "C" fn() = {
                #[cfg_attr(target_os = "android", link_section = ".text.startup")]
                #[cfg_attr(target_os = "linux", link_section = ".text.startup")]
                extern "C" fn __inner_init() {
                    // A poisoned registry only means another constructor panicked; the list itself is intact.
                    let mut guard = $crate::paste::paste!( $( $path_tt )* [< __gdbind_plugin_ $registry >] )
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    guard.push($plugin);
                }
                __inner_init
            };
        };
    };
}

/// Register a plugin to a registry.
#[doc(hidden)]
#[macro_export]
macro_rules! plugin_add {
    ( $registry:ident; $plugin:expr ) => {
        $crate::plugin_add_inner!($registry; $plugin; );
    };

    ( $registry:ident in $path:path; $plugin:expr ) => {
        $crate::plugin_add_inner!($registry; $plugin; $path ::);
    };
}

#[doc(hidden)]
#[macro_export]
#[cfg_attr(rustfmt, rustfmt::skip)]
macro_rules! plugin_foreach_inner {
    ( $registry:ident; $closure:expr; $( $path_tt:tt )* ) => {
        let guard = $crate::paste::paste!( $( $path_tt )* [< __gdbind_plugin_ $registry >] )
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        for e in guard.iter() {
            $closure(e);
        }
    };
}

/// Iterate over all plugins in unspecified order.
///
/// The registry stays locked while the closure runs, so it must not add plugins itself.
#[doc(hidden)]
#[macro_export]
macro_rules! plugin_foreach {
    ( $registry:ident; $closure:expr ) => {
        $crate::plugin_foreach_inner!($registry; $closure; );
    };

    ( $registry:ident in $path:path; $closure:expr ) => {
        $crate::plugin_foreach_inner!($registry; $closure; $path ::);
    };
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    struct Entry {
        class: &'static str,
        level: u8,
    }

    plugin_registry!(CLASSES: Entry);

    plugin_add!(CLASSES; Entry { class: "Noise", level: 2 });
    plugin_add!(CLASSES; Entry { class: "Sky", level: 2 });
    plugin_add!(CLASSES; Entry { class: "EditorTool", level: 3 });

    #[test]
    fn plugins_are_collected() {
        let mut scene = BTreeSet::new();
        let mut all = 0;

        plugin_foreach!(CLASSES; |e: &Entry| {
            all += 1;
            if e.level == 2 {
                scene.insert(e.class);
            }
        });

        assert_eq!(all, 3);
        assert_eq!(scene, BTreeSet::from(["Noise", "Sky"]));
    }
}
