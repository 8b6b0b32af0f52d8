/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Library entry point and the engine's initialization levels.

use std::sync::atomic::{AtomicBool, Ordering::Relaxed};

use crate::sys;

/// Stage of the engine initialization process.
///
/// Initialization and deinitialization are split into multiple stages, like a stack. At each level, a different
/// amount of engine functionality is available. Deinitialization happens in reverse order.
///
/// See also:
/// - [`ExtensionLibrary::on_level_init()`]
/// - [`ExtensionLibrary::on_level_deinit()`]
pub type InitLevel = sys::InitLevel;

/// Body of the `extern "C"` entry point generated by `#[gdextension]`.
///
/// # Safety
/// Must only be called by the engine, with the arguments it passes to the entry symbol.
#[doc(hidden)]
#[deny(unsafe_op_in_unsafe_fn)]
pub unsafe fn __gdext_load_library<E: ExtensionLibrary>(
    get_proc_address: sys::GDExtensionInterfaceGetProcAddress,
    library: sys::GDExtensionClassLibraryPtr,
    init: *mut sys::GDExtensionInitialization,
) -> sys::GDExtensionBool {
    let init_code = || {
        let tool_only_in_editor = match E::editor_run_behavior() {
            EditorRunBehavior::ToolClassesOnly => true,
            EditorRunBehavior::AllClasses => false,
        };

        let hot_reload = E::override_hot_reload().unwrap_or(cfg!(debug_assertions));
        let config = sys::GdextConfig::new(tool_only_in_editor, hot_reload);

        // SAFETY: pointers come straight from the engine; no other binding function runs concurrently during loading.
        unsafe { sys::initialize(get_proc_address, library, config) };

        let godot_init_params = sys::GDExtensionInitialization {
            minimum_initialization_level: E::min_level().to_sys(),
            userdata: std::ptr::null_mut(),
            initialize: Some(ffi_initialize_layer::<E>),
            deinitialize: Some(ffi_deinitialize_layer::<E>),
        };

        // SAFETY: the engine passes a valid, writable struct.
        unsafe { *init = godot_init_params };

        sys::bool_to_sys(true)
    };

    let ctx = || "error when loading GDExtension library";
    let is_success = crate::private::handle_panic(ctx, init_code);

    is_success.unwrap_or(sys::bool_to_sys(false))
}

static LEVEL_SERVERS_CORE_LOADED: AtomicBool = AtomicBool::new(false);

unsafe extern "C" fn ffi_initialize_layer<E: ExtensionLibrary>(
    _userdata: *mut std::ffi::c_void,
    init_level: sys::GDExtensionInitializationLevel,
) {
    let Some(level) = InitLevel::try_from_sys(init_level) else {
        crate::godot_warn!("unknown initialization level {init_level}; ignored");
        return;
    };

    let ctx = || format!("failed to initialize GDExtension level `{level:?}`");

    fn try_load<E: ExtensionLibrary>(level: InitLevel) {
        // When the extension is added to an already running editor, the engine skips straight to Scene.
        // Core and Servers still need their classes.
        if level == InitLevel::Scene {
            if !LEVEL_SERVERS_CORE_LOADED.load(Relaxed) {
                try_load::<E>(InitLevel::Core);
                try_load::<E>(InitLevel::Servers);
            }
        } else if level == InitLevel::Core {
            // When the engine starts normally, it initializes Core and Servers before Scene.
            LEVEL_SERVERS_CORE_LOADED.store(true, Relaxed);
        }

        gdext_on_level_init(level);
        E::on_level_init(level);
    }

    let _ = crate::private::handle_panic(ctx, || try_load::<E>(level));
}

unsafe extern "C" fn ffi_deinitialize_layer<E: ExtensionLibrary>(
    _userdata: *mut std::ffi::c_void,
    init_level: sys::GDExtensionInitializationLevel,
) {
    let Some(level) = InitLevel::try_from_sys(init_level) else {
        return;
    };

    let ctx = || format!("failed to deinitialize GDExtension level `{level:?}`");

    fn try_unload<E: ExtensionLibrary>(level: InitLevel) {
        if level == InitLevel::Core {
            LEVEL_SERVERS_CORE_LOADED.store(false, Relaxed);
        }

        E::on_level_deinit(level);
        gdext_on_level_deinit(level);

        // Mirror of `try_load()`: the engine never reports levels below the minimum, which were loaded along with Scene.
        if level == InitLevel::Scene && E::min_level() == InitLevel::Scene {
            try_unload::<E>(InitLevel::Servers);
            try_unload::<E>(InitLevel::Core);
        }
    }

    let _ = crate::private::handle_panic(ctx, || try_unload::<E>(level));
}

/// Tasks needed to be done by gdbind internally upon loading an initialization level. Called before user code.
fn gdext_on_level_init(level: InitLevel) {
    sys::out!("Init level {level:?}");
    crate::registry::class::register_classes(level);
}

/// Tasks needed to be done by gdbind internally upon unloading an initialization level. Called after user code.
fn gdext_on_level_deinit(level: InitLevel) {
    crate::registry::class::unregister_classes(level);

    if level == InitLevel::Core {
        // No engine calls are possible after this; cached method binds notice the new generation on reload.
        // SAFETY: all classes are unregistered and this is the last level.
        unsafe { sys::deinitialize() };
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Defines the entry point for a GDExtension Rust library.
///
/// Every library should have exactly one implementation of this trait. It is always used in combination with the
/// `#[gdextension]` proc-macro attribute.
///
/// The simplest usage is as follows. This will automatically perform the necessary init and cleanup routines, and
/// register all classes marked with `#[derive(GodotClass)]`, without needing to mention them in a central list.
///
/// ```no_run
/// use gdbind::init::*;
///
/// struct MyExtension;
///
/// #[gdextension]
/// unsafe impl ExtensionLibrary for MyExtension {}
/// ```
///
/// The entry symbol defaults to `gdext_rust_init` and can be changed with `#[gdextension(entry_symbol = my_init)]`.
/// It must match the `entry_symbol` key in the `.gdextension` file.
///
/// # Safety
/// The library cannot enforce any safety guarantees outside Rust code, which means that **you as a user** are
/// responsible to uphold them: namely in GDScript code or other GDExtension bindings loaded by the engine.
/// Violating this may cause undefined behavior, even when invoking _safe_ functions.
pub unsafe trait ExtensionLibrary {
    /// Determines if and how an extension's code is run in the editor.
    fn editor_run_behavior() -> EditorRunBehavior {
        EditorRunBehavior::ToolClassesOnly
    }

    /// Determines the initialization level at which the extension is loaded (`Scene` by default).
    ///
    /// If the level is lower than [`InitLevel::Scene`], the engine needs to be restarted to take effect.
    fn min_level() -> InitLevel {
        InitLevel::Scene
    }

    /// Custom logic when a certain init-level is loaded.
    ///
    /// Invoked for every level in ascending order, after the classes of that level are registered. Levels below
    /// [`Self::min_level()`] are not reported by the engine; they are loaded right before `Scene` and still reach this
    /// callback, so `Core` and `Servers` are always seen.
    #[allow(unused_variables)]
    fn on_level_init(level: InitLevel) {
        // Nothing by default.
    }

    /// Custom logic when a certain init-level is unloaded.
    ///
    /// Invoked for every level in descending order, before the classes of that level are unregistered. Mirrors
    /// [`Self::on_level_init()`], including `Servers` and `Core` being unloaded right after `Scene`.
    #[allow(unused_variables)]
    fn on_level_deinit(level: InitLevel) {
        // Nothing by default.
    }

    /// Whether to enable hot reloading of this library. Return `None` to use the default behavior.
    ///
    /// Without hot reloading, existing objects are not re-attached to new Rust instances when the library changes.
    /// By default, this is enabled for debug builds and disabled for release builds.
    fn override_hot_reload() -> Option<bool> {
        None
    }
}

/// Determines if and how an extension's code is run in the editor.
///
/// The engine runs all virtual lifecycle callbacks (`_ready`, `_process`, ...) of extension classes in the editor.
/// Most code is written to run in games, so by default only `#[class(tool)]` classes receive them there.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[non_exhaustive]
pub enum EditorRunBehavior {
    /// Only runs `#[class(tool)]` classes in the editor.
    ///
    /// All classes are registered, and calls from GDScript to Rust are possible. However, virtual lifecycle
    /// callbacks are not run unless the class is annotated with `#[class(tool)]`.
    ToolClassesOnly,

    /// Runs the extension with full functionality in editor.
    ///
    /// Ignores any `#[class(tool)]` annotations.
    AllClasses,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct DefaultLibrary;

    // SAFETY: only default methods are queried.
    unsafe impl ExtensionLibrary for DefaultLibrary {}

    #[test]
    fn library_defaults() {
        assert_eq!(DefaultLibrary::min_level(), InitLevel::Scene);
        assert_eq!(
            DefaultLibrary::editor_run_behavior(),
            EditorRunBehavior::ToolClassesOnly
        );
        assert_eq!(DefaultLibrary::override_hot_reload(), None);
    }
}
