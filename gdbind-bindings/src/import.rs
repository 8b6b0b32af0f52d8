/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Selection of the prebuilt API module, depending on `api-*` features.

/// All supported Godot minor releases, plus the upcoming one (used for `before_api` cfgs).
pub const ALL_VERSIONS: &[(u8, u8, u8)] = &[
    (4, 2, 0),
    (4, 3, 0),
    (4, 4, 0),
    (4, 5, 0),
    (4, 6, 0),
];

#[cfg(feature = "api-4-2")]
pub use gdextension_api::version_4_2 as prebuilt;
#[cfg(feature = "api-4-3")]
pub use gdextension_api::version_4_3 as prebuilt;
#[cfg(feature = "api-4-4")]
pub use gdextension_api::version_4_4 as prebuilt;
#[cfg(feature = "api-4-5")]
pub use gdextension_api::version_4_5 as prebuilt;

// If none of the api-* features are provided, use default prebuilt version (latest Godot stable release).
#[cfg(not(any(
    feature = "api-4-2",
    feature = "api-4-3",
    feature = "api-4-4",
    feature = "api-4-5",
)))]
pub use gdextension_api::version_4_5 as prebuilt;

/// The `(major, minor, patch)` triple of the API selected through features.
pub const SELECTED_VERSION: (u8, u8, u8) = if cfg!(feature = "api-4-2") {
    ALL_VERSIONS[0]
} else if cfg!(feature = "api-4-3") {
    ALL_VERSIONS[1]
} else if cfg!(feature = "api-4-4") {
    ALL_VERSIONS[2]
} else {
    ALL_VERSIONS[3]
};
