/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Non-thread safe binding storage.
//!
//! If used from different threads then there will be runtime errors in debug mode and UB in release mode.

use std::cell::{Cell, UnsafeCell};
use std::sync::atomic::{AtomicBool, Ordering};

use super::GodotBinding;
use crate::toolbox::debug_assert_godot;

thread_local! {
    static IS_MAIN_THREAD: Cell<bool> = const { Cell::new(false) };
}

pub(super) struct BindingStorage {
    initialized: AtomicBool,
    binding: UnsafeCell<Option<GodotBinding>>,
}

// SAFETY: `binding` is only written during (de)initialization, and only read from the thread that initialized it.
unsafe impl Sync for BindingStorage {}

static STORAGE: BindingStorage = BindingStorage {
    initialized: AtomicBool::new(false),
    binding: UnsafeCell::new(None),
};

impl BindingStorage {
    /// # Safety
    /// Must not be called concurrently with any other access to the binding.
    pub unsafe fn initialize(binding: GodotBinding) {
        assert!(
            !STORAGE.initialized.load(Ordering::Acquire),
            "Godot binding is already initialized"
        );

        *STORAGE.binding.get() = Some(binding);
        IS_MAIN_THREAD.with(|is_main| is_main.set(true));
        STORAGE.initialized.store(true, Ordering::Release);
    }

    /// # Safety
    /// Must be called from the main thread; no references to the binding may outlive this call.
    pub unsafe fn deinitialize() {
        Self::check_main_thread();

        STORAGE.initialized.store(false, Ordering::Release);
        let binding = (*STORAGE.binding.get()).take();
        drop(binding);

        IS_MAIN_THREAD.with(|is_main| is_main.set(false));
    }

    /// Get the binding from the binding storage.
    ///
    /// # Safety
    /// - Must be called from the main thread.
    /// - The binding must be initialized.
    #[inline(always)]
    pub unsafe fn get_binding_unchecked() -> &'static GodotBinding {
        let binding = &*STORAGE.binding.get();

        if cfg!(debug_assertions) {
            debug_assert_godot!(binding.is_some());
            Self::check_main_thread();
        }

        match binding {
            Some(binding) => binding,
            None => std::hint::unreachable_unchecked(),
        }
    }

    pub fn is_initialized() -> bool {
        STORAGE.initialized.load(Ordering::Acquire)
    }

    pub fn is_main_thread() -> bool {
        IS_MAIN_THREAD.with(|is_main| is_main.get())
    }

    fn check_main_thread() {
        assert!(
            Self::is_main_thread(),
            "attempted to access binding from different thread than main thread; \
            this is UB - use the \"experimental-threads\" feature."
        );
    }
}
