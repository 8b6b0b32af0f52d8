/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::sync::Mutex;

use gdbind::init::InitLevel;

use crate::framework::itest;

static INIT_LEVELS: Mutex<Vec<InitLevel>> = Mutex::new(Vec::new());
static DEINIT_LEVELS: Mutex<Vec<InitLevel>> = Mutex::new(Vec::new());

pub fn record_init_level(level: InitLevel) {
    lock(&INIT_LEVELS).push(level);
}

pub fn record_deinit_level(level: InitLevel) {
    lock(&DEINIT_LEVELS).push(level);
}

fn lock(levels: &Mutex<Vec<InitLevel>>) -> std::sync::MutexGuard<'_, Vec<InitLevel>> {
    levels.lock().unwrap_or_else(|e| e.into_inner())
}

#[itest]
fn init_levels_are_ascending() {
    let levels = lock(&INIT_LEVELS).clone();

    // Core and Servers are loaded along with Scene, even when the engine skips them.
    assert_eq!(
        levels.get(..3),
        Some([InitLevel::Core, InitLevel::Servers, InitLevel::Scene].as_slice())
    );
    assert!(levels.windows(2).all(|pair| pair[0] < pair[1]), "{levels:?}");
}

#[itest]
fn no_level_deinitialized_while_running() {
    assert!(lock(&DEINIT_LEVELS).is_empty());
}
