/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::classes::{Material, Object, RefCounted, Resource};
use crate::obj::Gd;

engine_class! {
    /// Background and ambient light of an environment, drawn from a sky material.
    pub struct Sky: Resource: RefCounted: Object;
    memory = MemRefCounted, MemRefCounted;
    init_level = Scene;
    instantiable;
}

engine_methods! {
    impl Sky {
        fn set_radiance_size(&mut self, size: RadianceSize) = 1512957179;
        fn get_radiance_size(&self) -> RadianceSize = 2708733976;

        fn set_process_mode(&mut self, mode: ProcessMode) = 875986769;
        fn get_process_mode(&self) -> ProcessMode = 731245043;

        /// Material used to draw the background; `None` clears it.
        fn set_material(&mut self, material: Option<&Gd<Material>>) = 2757459619;
        fn get_material(&self) -> Option<Gd<Material>> = 5934680;
    }
}

engine_enum! {
    /// Size of the radiance map, named `Sky.RadianceSize` in the engine.
    pub enum RadianceSize {
        SIZE_32 = 0,
        SIZE_64 = 1,
        SIZE_128 = 2,
        SIZE_256 = 3,
        SIZE_512 = 4,
        SIZE_1024 = 5,
        SIZE_2048 = 6,
        MAX = 7,
    }
}

engine_enum! {
    /// How the radiance map is updated, named `Sky.ProcessMode` in the engine.
    pub enum ProcessMode {
        AUTOMATIC = 0,
        QUALITY = 1,
        INCREMENTAL = 2,
        REALTIME = 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::FromGodot;

    #[test]
    fn radiance_size_roundtrip() {
        for &size in RadianceSize::ALL {
            assert_eq!(RadianceSize::try_from_ord(size.ord()), Some(size));
        }

        assert_eq!(RadianceSize::from_godot(5), RadianceSize::SIZE_1024);
        assert!(RadianceSize::try_from_godot(8).is_err());
    }

    #[test]
    fn process_mode_names() {
        let names: Vec<_> = ProcessMode::ALL.iter().map(|m| m.as_str().unwrap_or("?")).collect();
        assert_eq!(names, ["AUTOMATIC", "QUALITY", "INCREMENTAL", "REALTIME"]);
    }
}
