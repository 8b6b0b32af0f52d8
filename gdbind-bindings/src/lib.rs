/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Build-time helpers shared by the `build.rs` scripts of the gdbind crates.
//!
//! Writes the Rust translation of `gdextension_interface.h` and emits version cfgs, for the Godot API
//! selected through `api-*` features.

mod import;

use std::path::Path;

use import::prebuilt;
pub use import::ALL_VERSIONS;

/// Godot version that the bindings are compiled against.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct GodotVersion {
    pub major: u8,
    pub minor: u8,

    /// 0 if none
    pub patch: u8,
}

impl GodotVersion {
    fn from_triple((major, minor, patch): (u8, u8, u8)) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version string as Godot prints it; the patch component is dropped when 0.
    pub fn to_short_string(&self) -> String {
        let Self {
            major,
            minor,
            patch,
        } = self;

        if *patch == 0 {
            format!("{major}.{minor}")
        } else {
            format!("{major}.{minor}.{patch}")
        }
    }
}

/// Returns the API version selected through `api-*` features.
pub fn get_godot_version() -> GodotVersion {
    GodotVersion::from_triple(import::SELECTED_VERSION)
}

/// Writes the Rust bindings of the GDExtension C header to `rs_path`.
pub fn write_gdextension_headers(rs_path: &Path) {
    let rs_contents = prebuilt::load_gdextension_header_rs().to_string();

    if let Some(dir) = rs_path.parent() {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("failed to create dir {}: {e}", dir.display()));
    }

    std::fs::write(rs_path, rs_contents)
        .unwrap_or_else(|e| panic!("failed to write gdextension_interface.rs: {e}"));
}

/// Writes a small Rust file exposing the selected API version as constants.
pub fn write_version_constants(rs_path: &Path) {
    let GodotVersion {
        major,
        minor,
        patch,
    } = get_godot_version();

    let code = format!(
        "/// Godot API version that gdbind was compiled against, as `(major, minor, patch)`.\n\
         pub const GODOT_API_VERSION: (u8, u8, u8) = ({major}, {minor}, {patch});\n\
         \n\
         /// Same as [`GODOT_API_VERSION`], as string.\n\
         pub const GODOT_API_VERSION_STRING: &str = \"{version}\";\n",
        version = get_godot_version().to_short_string(),
    );

    std::fs::write(rs_path, code)
        .unwrap_or_else(|e| panic!("failed to write version constants: {e}"));
}

/// Emits `since_api` and `before_api` cfgs for the selected version.
///
/// Starts at 4.2, since older versions are not supported.
pub fn emit_godot_version_cfg() {
    let GodotVersion { major, minor, .. } = get_godot_version();

    for (_, m, _) in ALL_VERSIONS.iter().copied() {
        if m <= minor {
            println!(r#"cargo:rustc-cfg=since_api="{major}.{m}""#);
        } else {
            println!(r#"cargo:rustc-cfg=before_api="{major}.{m}""#);
        }
    }
}

/// Declares all cfgs emitted by [`emit_godot_version_cfg()`], so that `unexpected_cfgs` stays quiet.
pub fn emit_checks() {
    let versions = ALL_VERSIONS
        .iter()
        .map(|(major, minor, _)| format!(r#""{major}.{minor}""#))
        .collect::<Vec<_>>()
        .join(", ");

    println!(r#"cargo:rustc-check-cfg=cfg(since_api, values({versions}))"#);
    println!(r#"cargo:rustc-check-cfg=cfg(before_api, values({versions}))"#);
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_drops_zero_patch() {
        let v = GodotVersion::from_triple((4, 3, 0));
        assert_eq!(v.to_short_string(), "4.3");

        let v = GodotVersion::from_triple((4, 2, 2));
        assert_eq!(v.to_short_string(), "4.2.2");
    }

    #[test]
    fn versions_are_ordered() {
        let sorted = ALL_VERSIONS.windows(2).all(|w| w[0] < w[1]);
        assert!(sorted, "ALL_VERSIONS must be sorted ascending");

        let selected = get_godot_version();
        assert!(ALL_VERSIONS.contains(&(selected.major, selected.minor, selected.patch)));
        assert!(selected >= GodotVersion::from_triple((4, 2, 0)));
    }
}
