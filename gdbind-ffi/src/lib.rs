/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! # Internal crate of [**gdbind**](https://docs.rs/gdbind)
//!
//! Low level bindings to the GDExtension C API: raw types of `gdextension_interface.h`, the global binding with the
//! loaded interface table, method-bind lookup and the `GodotFfi` marshalling trait.
//!
//! Do not use this crate directly, go through the `gdbind` facade instead.

#![cfg_attr(test, allow(unused))]

// Prebuilt C header translation for the selected API version.
#[rustfmt::skip]
#[allow(
    non_camel_case_types,
    non_upper_case_globals,
    non_snake_case,
    dead_code,
    deref_nullptr,
    clippy::all,
    clippy::pedantic
)]
mod gdextension_interface {
    include!(concat!(env!("OUT_DIR"), "/gdextension_interface.rs"));
}

mod api_version {
    include!(concat!(env!("OUT_DIR"), "/api_version.rs"));
}

mod binding;
mod builtin_lifecycle;
mod global;
mod godot_ffi;
mod init_level;
mod interface;
mod method_bind;
mod opaque;
mod plugins;
mod string_cache;
mod toolbox;
mod variant_type;

// See https://github.com/dtolnay/paste/issues/69#issuecomment-962418430
// and https://users.rust-lang.org/t/proc-macros-using-third-party-crate/42465/4
#[doc(hidden)]
pub use paste;

pub use api_version::*;
pub use binding::{
    binding_generation, builtin_lifecycle_api, config, get_interface, get_library, is_initialized,
    is_main_thread, runtime_godot_version, with_string_cache, GdextConfig,
};
pub use builtin_lifecycle::*;
pub use gdextension_interface::*;
pub use global::*;
pub use godot_ffi::{GodotFfi, GodotNullableFfi, PtrcallType};
pub use init_level::*;
pub use interface::{runtime_version, GDExtensionInterface};
pub use method_bind::*;
pub use opaque::*;
pub use string_cache::StringCache;
pub use toolbox::*;
pub use variant_type::VariantType;

use binding::GodotBinding;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Initialization

/// Loads the interface table and everything that depends on it, then stores the binding globally.
///
/// # Safety
///
/// - `get_proc_address` and `library` must be the pointers given by Godot to the entry point.
/// - Must not be called concurrently with any other function of this crate.
/// - Must be called before any use of [`get_interface`], [`get_library`] and friends.
pub unsafe fn initialize(
    get_proc_address: GDExtensionInterfaceGetProcAddress,
    library: GDExtensionClassLibraryPtr,
    config: GdextConfig,
) {
    out!("Initialize gdbind...");

    interface::ensure_runtime_compatibility(get_proc_address);

    let version = runtime_version(get_proc_address);
    let version_triple = (version.major as u8, version.minor as u8, version.patch as u8);

    let interface = GDExtensionInterface::load(get_proc_address).unwrap_or_else(|missing| {
        panic!("failed to load GDExtension interface function `{missing}`; Godot binary too old?")
    });
    out!("Loaded interface.");

    let builtin_lifecycle = BuiltinLifecycleTable::load(&interface);
    let string_cache = StringCache::new(&interface, &builtin_lifecycle);
    out!("Loaded builtin lifecycle table.");

    binding::initialize_binding(GodotBinding::new(
        interface,
        library,
        builtin_lifecycle,
        string_cache,
        version_triple,
        config,
    ));

    println!(
        "Initialize gdbind API for Rust: {}",
        read_version_string(&version)
    );
}

/// Drops the binding and all state loaded with it. A subsequent [`initialize`] is allowed.
///
/// # Safety
///
/// Must not be called concurrently with other functions of this crate. Pointers obtained from the binding must not
/// be used afterwards.
pub unsafe fn deinitialize() {
    out!("Deinitialize gdbind...");
    binding::deinitialize_binding();
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Macros to access low-level function bindings

/// Fetches a function pointer from the interface table.
///
/// Entries are non-null once the binding is initialized, so no check happens here.
#[macro_export]
#[doc(hidden)]
macro_rules! interface_fn {
    ($name:ident) => {{
        unsafe { $crate::get_interface().$name.unwrap_unchecked() }
    }};
}
