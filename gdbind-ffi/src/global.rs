/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard};

/// Lazily initialized global with mutable access through a guard.
///
/// Has a `const` constructor so it can live in a `static`, and keeps the initialization function in one place instead
/// of every use site. Used for registries that live as long as the library, such as loaded classes.
pub struct Global<T> {
    value: Mutex<State<T>>,
}

enum State<T> {
    Pending(fn() -> T),
    Ready(T),
}

impl<T> Global<T> {
    /// Create `Global<T>`; `init_fn` runs on first [`lock()`](Self::lock).
    pub const fn new(init_fn: fn() -> T) -> Self {
        Self {
            value: Mutex::new(State::Pending(init_fn)),
        }
    }

    /// Create `Global<T>` with `T::default()` as initialization function.
    ///
    /// Inherent rather than `Default`, because the trait method is not `const`.
    pub const fn default() -> Self
    where
        T: Default,
    {
        Self::new(T::default)
    }

    /// Returns a guard that gives shared or mutable access to the value, initializing it if needed.
    ///
    /// Blocks until the internal mutex is available.
    ///
    /// # Panics
    /// If a previous holder of the guard panicked.
    pub fn lock(&self) -> GlobalGuard<'_, T> {
        let mut guard = self.value.lock().expect("Global<T> poisoned by earlier panic");

        if let State::Pending(init_fn) = *guard {
            *guard = State::Ready(init_fn());
        }

        GlobalGuard { guard }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Guards

/// Guard that temporarily gives access to a `Global<T>`'s inner value.
pub struct GlobalGuard<'a, T> {
    guard: MutexGuard<'a, State<T>>,
}

impl<T> Deref for GlobalGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &*self.guard {
            State::Ready(value) => value,
            // Guards are only handed out after initialization.
            State::Pending(_) => unreachable!(),
        }
    }
}

impl<T> DerefMut for GlobalGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut *self.guard {
            State::Ready(value) => value,
            State::Pending(_) => unreachable!(),
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    static NAMES: Global<HashMap<u64, &'static str>> = Global::default();
    static LEVELS: Global<Vec<u8>> = Global::new(|| vec![0, 1]);

    #[test]
    fn lazy_map() {
        NAMES.lock().insert(7, "Sky");
        NAMES.lock().insert(9, "Noise");

        let names = NAMES.lock();
        assert_eq!(names.get(&7), Some(&"Sky"));
        assert_eq!(names.get(&9), Some(&"Noise"));
    }

    #[test]
    fn init_fn_runs_once() {
        LEVELS.lock().push(2);
        LEVELS.lock().push(3);

        assert_eq!(*LEVELS.lock(), [0, 1, 2, 3]);
    }
}
