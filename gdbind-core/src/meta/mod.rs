/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Meta-information about types crossing the engine boundary: conversions, call frames, signatures and class names.

mod call_context;
mod class_name;
mod godot_convert;
mod godot_type;
mod param_tuple;
mod property_info;
mod signature;

pub mod error;

pub use class_name::ClassName;
pub use godot_convert::{FromGodot, GodotConvert, ToGodot};
pub use param_tuple::{InParamTuple, OutParamTuple, ParamTuple};
pub use property_info::{MethodParamOrReturnInfo, PropertyHint, PropertyInfo, PropertyUsageFlags};
pub use godot_type::GodotType;

#[doc(hidden)]
pub use call_context::CallContext;
#[doc(hidden)]
pub use godot_type::GodotFfiVariant;
#[doc(hidden)]
pub use signature::Signature;

pub(crate) use godot_type::sealed;

pub(crate) use crate::impl_godot_as_self;
