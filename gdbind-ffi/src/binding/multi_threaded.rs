/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Thread safe binding storage.
//!
//! The binding may be read from any thread; (de)initialization must still not race with readers.
//!
//! The user of these structs and functions must still ensure that multi-threaded usage of the various pointers is safe.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};

use super::GodotBinding;

pub(super) struct BindingStorage {
    initialized: AtomicBool,
    binding: UnsafeCell<Option<GodotBinding>>,
}

// SAFETY: `binding` is only written during (de)initialization, which is not concurrent with reads.
unsafe impl Sync for BindingStorage {}

static STORAGE: BindingStorage = BindingStorage {
    initialized: AtomicBool::new(false),
    binding: UnsafeCell::new(None),
};

impl BindingStorage {
    /// # Safety
    /// Must not be called concurrently with [`get_binding_unchecked`](BindingStorage::get_binding_unchecked).
    pub unsafe fn initialize(binding: GodotBinding) {
        assert!(
            !STORAGE.initialized.load(Ordering::Acquire),
            "Godot binding is already initialized"
        );

        *STORAGE.binding.get() = Some(binding);
        STORAGE.initialized.store(true, Ordering::Release);
    }

    /// # Safety
    /// Must not be called concurrently with any other access; no references to the binding may outlive this call.
    pub unsafe fn deinitialize() {
        STORAGE.initialized.store(false, Ordering::Release);
        let binding = (*STORAGE.binding.get()).take();
        drop(binding);
    }

    /// # Safety
    /// The binding must be initialized.
    #[inline(always)]
    pub unsafe fn get_binding_unchecked() -> &'static GodotBinding {
        debug_assert!(
            Self::is_initialized(),
            "Godot engine not available; make sure you are not calling it from unit/doc tests"
        );

        match &*STORAGE.binding.get() {
            Some(binding) => binding,
            None => std::hint::unreachable_unchecked(),
        }
    }

    pub fn is_initialized() -> bool {
        STORAGE.initialized.load(Ordering::Acquire)
    }

    pub fn is_main_thread() -> bool {
        true
    }
}
