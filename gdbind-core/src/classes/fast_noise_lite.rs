/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::Vector3;
use crate::classes::{Noise, Object, RefCounted, Resource};

engine_class! {
    /// Fast noise generator with several algorithms, fractal layering and domain warping.
    pub struct FastNoiseLite: Noise: Resource: RefCounted: Object;
    memory = MemRefCounted, MemRefCounted;
    init_level = Scene;
    instantiable;
}

engine_methods! {
    impl FastNoiseLite {
        fn set_noise_type(&mut self, noise_type: NoiseType) = 2624461392;
        fn get_noise_type(&self) -> NoiseType = 1458108610;

        fn set_seed(&mut self, seed: i32) = 1286410249;
        fn get_seed(&self) -> i32 = 3905245786;

        /// Higher frequencies give rougher, more granular noise.
        fn set_frequency(&mut self, freq: f32) = 373806689;
        fn get_frequency(&self) -> f32 = 1740695150;

        fn set_offset(&mut self, offset: Vector3) = 3460891852;
        fn get_offset(&self) -> Vector3 = 3360562783;

        /// Number of layers sampled for fractal noise.
        fn set_fractal_octaves(&mut self, octave_count: i32) = 1286410249;
        fn get_fractal_octaves(&self) -> i32 = 3905245786;

        fn set_domain_warp_enabled(&mut self, domain_warp_enabled: bool) = 2586408642;
        fn is_domain_warp_enabled(&self) -> bool = 36873697;
    }
}

engine_enum! {
    /// Noise algorithm, named `FastNoiseLite.NoiseType` in the engine.
    pub enum NoiseType {
        SIMPLEX = 0,
        SIMPLEX_SMOOTH = 1,
        /// Cellular (Voronoi) noise.
        CELLULAR = 2,
        PERLIN = 3,
        VALUE_CUBIC = 4,
        VALUE = 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{FromGodot, ToGodot};

    #[test]
    fn noise_type_ordinals() {
        assert_eq!(NoiseType::PERLIN.ord(), 3);
        assert_eq!(NoiseType::try_from_ord(2), Some(NoiseType::CELLULAR));
        assert_eq!(NoiseType::try_from_ord(6), None);
        assert_eq!(NoiseType::ALL.len(), 6);
    }

    #[test]
    fn noise_type_conversion() {
        assert_eq!(NoiseType::VALUE_CUBIC.to_godot(), 4_i64);
        assert_eq!(NoiseType::from_godot(1), NoiseType::SIMPLEX_SMOOTH);

        let err = NoiseType::try_from_godot(42).unwrap_err();
        assert_eq!(err.to_string(), "no NoiseType with this ordinal (value: 42)");
        assert!(NoiseType::try_from_godot(i64::MIN).is_err());
    }

    #[test]
    fn noise_type_debug() {
        assert_eq!(format!("{:?}", NoiseType::SIMPLEX), "NoiseType::SIMPLEX");
        assert_eq!(NoiseType::VALUE.as_str(), Some("VALUE"));
    }

    #[test]
    fn noise_type_debug_unknown_ordinal() {
        let unknown = NoiseType { ord: 99 };
        assert_eq!(unknown.as_str(), None);
        assert_eq!(format!("{unknown:?}"), "NoiseType(99)");
    }
}
