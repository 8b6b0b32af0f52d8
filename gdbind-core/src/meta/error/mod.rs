/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Errors in the gdbind library.

mod call_error;
mod convert_error;

pub use call_error::*;
pub use convert_error::*;

/// Result of a function call that can fail.
pub type CallResult<R> = Result<R, CallError>;
