/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

// `api-*` validation is required here because otherwise, user gets confusing error about conflicting module imports.
// Dependent crates cannot do this check themselves, since this crate is compiled before them and already fails.

#[rustfmt::skip]
fn main() {
    let mut count = 0;
    if cfg!(feature = "api-4-2") { count += 1; }
    if cfg!(feature = "api-4-3") { count += 1; }
    if cfg!(feature = "api-4-4") { count += 1; }
    if cfg!(feature = "api-4-5") { count += 1; }

    assert!(count <= 1, "ERROR: at most one `api-*` feature can be enabled");
}
