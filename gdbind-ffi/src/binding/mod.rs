/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Process-global binding: the interface table and everything loaded alongside it.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::{BuiltinLifecycleTable, GDExtensionClassLibraryPtr, GDExtensionInterface, StringCache};

#[cfg(feature = "experimental-threads")]
mod multi_threaded;
#[cfg(not(feature = "experimental-threads"))]
mod single_threaded;

#[cfg(feature = "experimental-threads")]
use multi_threaded::BindingStorage;
#[cfg(not(feature = "experimental-threads"))]
use single_threaded::BindingStorage;

// Field order matters: the string cache is dropped first, while the engine is still reachable.
pub(crate) struct GodotBinding {
    string_cache: Mutex<StringCache>,
    interface: GDExtensionInterface,
    library: ClassLibraryPtr,
    builtin_lifecycle: BuiltinLifecycleTable,
    runtime_version: (u8, u8, u8),
    config: GdextConfig,
}

impl GodotBinding {
    pub fn new(
        interface: GDExtensionInterface,
        library: GDExtensionClassLibraryPtr,
        builtin_lifecycle: BuiltinLifecycleTable,
        string_cache: StringCache,
        runtime_version: (u8, u8, u8),
        config: GdextConfig,
    ) -> Self {
        Self {
            string_cache: Mutex::new(string_cache),
            interface,
            library: ClassLibraryPtr(library),
            builtin_lifecycle,
            runtime_version,
            config,
        }
    }
}

/// Newtype around `GDExtensionClassLibraryPtr` so we can implement `Sync` and `Send` manually for this.
struct ClassLibraryPtr(GDExtensionClassLibraryPtr);

// SAFETY: only the pointer value is shared between threads. Any place that dereferences it must ensure thread safety itself,
// which requires `unsafe` anyway.
unsafe impl Sync for ClassLibraryPtr {}
// SAFETY: See `Sync` impl safety doc.
unsafe impl Send for ClassLibraryPtr {}

/// Configuration of the extension library, set up by the entry point.
pub struct GdextConfig {
    /// Whether classes without `#[class(tool)]` are kept out of the editor.
    pub tool_only_in_editor: bool,

    /// Whether the library asked for hot reloading.
    pub hot_reload: bool,

    is_editor: OnceLock<bool>,
}

impl GdextConfig {
    pub fn new(tool_only_in_editor: bool, hot_reload: bool) -> Self {
        Self {
            tool_only_in_editor,
            hot_reload,
            is_editor: OnceLock::new(),
        }
    }

    /// Caches whether the engine runs as editor; only queried once, since it cannot change.
    pub fn is_editor_or_init(&self, is_editor: impl FnOnce() -> bool) -> bool {
        *self.is_editor.get_or_init(is_editor)
    }
}

/// Incremented on every initialization, so that cached function pointers can detect a reload.
static GENERATION: AtomicU32 = AtomicU32::new(0);

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Public API

/// # Safety
///
/// The Godot binding must have been initialized before calling this function.
///
/// If "experimental-threads" is not enabled, then this must be called from the same thread that the bindings were initialized from.
#[inline(always)]
pub unsafe fn get_interface() -> &'static GDExtensionInterface {
    &get_binding().interface
}

/// # Safety
///
/// See [`get_interface()`].
#[inline(always)]
pub unsafe fn get_library() -> GDExtensionClassLibraryPtr {
    get_binding().library.0
}

/// # Safety
///
/// See [`get_interface()`].
#[inline(always)]
pub unsafe fn builtin_lifecycle_api() -> &'static BuiltinLifecycleTable {
    &get_binding().builtin_lifecycle
}

/// # Safety
///
/// See [`get_interface()`].
#[inline]
pub unsafe fn config() -> &'static GdextConfig {
    &get_binding().config
}

/// Version of the running engine as `(major, minor, patch)`.
///
/// # Safety
///
/// See [`get_interface()`].
pub unsafe fn runtime_godot_version() -> (u8, u8, u8) {
    get_binding().runtime_version
}

/// Runs `f` with exclusive access to the global `StringName` cache.
///
/// # Panics
/// If the binding is not initialized, or when called re-entrantly from within `f`.
pub fn with_string_cache<R>(f: impl FnOnce(&mut StringCache) -> R) -> R {
    assert!(is_initialized(), "string cache used outside of Godot runtime");

    // SAFETY: binding is initialized, see above.
    let binding = unsafe { get_binding() };
    let mut cache = binding
        .string_cache
        .try_lock()
        .expect("string cache is already in use (re-entrant access)");

    f(&mut cache)
}

#[inline]
pub fn is_initialized() -> bool {
    BindingStorage::is_initialized()
}

/// Counter identifying the current initialization; 0 before the first one.
#[inline]
pub fn binding_generation() -> u32 {
    GENERATION.load(Ordering::Acquire)
}

/// Whether the current thread is the one that initialized the binding.
///
/// With "experimental-threads", this cannot be tracked and always returns `true`.
pub fn is_main_thread() -> bool {
    BindingStorage::is_main_thread()
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Crate-local implementation

/// Initializes the Godot binding.
///
/// Most other functions in this module rely on this function being called first as a safety condition.
///
/// # Safety
///
/// Must not be called concurrently with other functions that interact with the bindings.
pub(crate) unsafe fn initialize_binding(binding: GodotBinding) {
    BindingStorage::initialize(binding);
    GENERATION.fetch_add(1, Ordering::AcqRel);
}

/// Deinitializes the Godot binding, dropping all state loaded with it.
///
/// # Safety
///
/// See [`initialize_binding`]. No references obtained from the getters above may be used afterwards.
pub(crate) unsafe fn deinitialize_binding() {
    BindingStorage::deinitialize();
}

/// # Safety
///
/// The Godot binding must have been initialized before calling this function.
///
/// If "experimental-threads" is not enabled, then this must be called from the same thread that the bindings were initialized from.
#[inline(always)]
pub(crate) unsafe fn get_binding() -> &'static GodotBinding {
    BindingStorage::get_binding_unchecked()
}
