/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::{Vector2, Vector3};
use crate::classes::{Object, RefCounted, Resource};

engine_class! {
    /// Abstract base class for noise generators.
    ///
    /// All methods return values in roughly `[-1, 1]`, depending on the concrete generator.
    pub struct Noise: Resource: RefCounted: Object;
    memory = MemRefCounted, MemRefCounted;
    init_level = Scene;
    not_instantiable;
}

engine_methods! {
    impl Noise {
        fn get_noise_1d(&self, x: f32) -> f32 = 3919130443;
        fn get_noise_2d(&self, x: f32, y: f32) -> f32 = 2753205203;
        fn get_noise_2dv(&self, v: Vector2) -> f32 = 2276447920;
        fn get_noise_3d(&self, x: f32, y: f32, z: f32) -> f32 = 973811851;
        fn get_noise_3dv(&self, v: Vector3) -> f32 = 1109078154;
    }
}

engine_interface! {
    /// Virtual methods of [`Noise`].
    pub trait INoise {}
}
