/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use gdbind::builtin::{Vector2, Vector3};
use gdbind::classes::{FastNoiseLite, Noise, NoiseType};
use gdbind::obj::{Gd, NewGd};

use crate::framework::itest;

fn sample_grid(noise: &Gd<FastNoiseLite>) -> Vec<f32> {
    (0..8)
        .flat_map(|x| (0..8).map(move |y| (x as f32 * 7.5, y as f32 * 3.25)))
        .map(|(x, y)| noise.get_noise_2d(x, y))
        .collect()
}

#[itest]
fn noise_defaults() {
    let noise = FastNoiseLite::new_gd();

    assert_eq!(noise.get_noise_type(), NoiseType::SIMPLEX_SMOOTH);
    assert_eq!(noise.get_seed(), 0);
    assert_eq!(noise.get_fractal_octaves(), 5);
    assert!(!noise.is_domain_warp_enabled());
    assert_eq!(noise.get_offset(), Vector3::ZERO);
}

#[itest]
fn noise_setters_roundtrip() {
    let mut noise = FastNoiseLite::new_gd();

    noise.set_noise_type(NoiseType::CELLULAR);
    noise.set_seed(1234);
    noise.set_frequency(0.25);
    noise.set_offset(Vector3::new(1.0, -2.0, 3.5));
    noise.set_fractal_octaves(3);
    noise.set_domain_warp_enabled(true);

    assert_eq!(noise.get_noise_type(), NoiseType::CELLULAR);
    assert_eq!(noise.get_seed(), 1234);
    assert_eq!(noise.get_frequency(), 0.25);
    assert_eq!(noise.get_offset(), Vector3::new(1.0, -2.0, 3.5));
    assert_eq!(noise.get_fractal_octaves(), 3);
    assert!(noise.is_domain_warp_enabled());
}

#[itest]
fn noise_values_in_range() {
    let mut noise = FastNoiseLite::new_gd();

    for &noise_type in NoiseType::ALL {
        noise.set_noise_type(noise_type);

        for value in sample_grid(&noise) {
            assert!((-1.0..=1.0).contains(&value), "{noise_type:?}: {value}");
        }
        let value = noise.get_noise_3d(0.5, 1.5, 2.5);
        assert!((-1.0..=1.0).contains(&value), "{noise_type:?}: {value}");
    }
}

#[itest]
fn noise_same_seed_is_deterministic() {
    let mut first = FastNoiseLite::new_gd();
    let mut second = FastNoiseLite::new_gd();
    first.set_seed(77);
    second.set_seed(77);

    assert_eq!(sample_grid(&first), sample_grid(&second));

    second.set_seed(78);
    assert_ne!(sample_grid(&first), sample_grid(&second));
}

#[itest]
fn noise_vector_overloads_match() {
    let mut noise = FastNoiseLite::new_gd();
    noise.set_seed(5);

    assert_eq!(noise.get_noise_2d(3.0, 4.0), noise.get_noise_2dv(Vector2::new(3.0, 4.0)));
    assert_eq!(
        noise.get_noise_3d(3.0, 4.0, 5.0),
        noise.get_noise_3dv(Vector3::new(3.0, 4.0, 5.0))
    );
}

#[itest]
fn noise_through_base_class() {
    let mut concrete = FastNoiseLite::new_gd();
    concrete.set_seed(9);
    let expected = concrete.get_noise_1d(0.75);

    let noise: Gd<Noise> = concrete.upcast();
    assert_eq!(noise.get_noise_1d(0.75), expected);

    let concrete = noise.cast::<FastNoiseLite>();
    assert_eq!(concrete.get_seed(), 9);
}
