/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod engine_test;
mod material_test;
mod node_test;
mod noise_test;
mod resource_test;
mod sky_test;
mod tile_set_test;
