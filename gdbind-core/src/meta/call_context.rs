/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::borrow::Cow;
use std::fmt;

/// Names the function a call frame belongs to, for diagnostics.
///
/// Displays as `Class::function`, or just `function` for utility functions.
#[derive(Clone, Debug)]
#[doc(hidden)]
pub struct CallContext<'a> {
    pub(crate) class_name: Cow<'a, str>,
    pub(crate) function_name: &'a str,
}

impl<'a> CallContext<'a> {
    /// The engine calls a user `#[func]` or virtual method.
    pub const fn func(class_name: &'a str, function_name: &'a str) -> Self {
        Self {
            class_name: Cow::Borrowed(class_name),
            function_name,
        }
    }

    /// Rust calls into the engine. Utility functions pass an empty class name.
    pub const fn outbound(class_name: &'a str, function_name: &'a str) -> Self {
        Self::func(class_name, function_name)
    }
}

impl fmt::Display for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class_name.as_ref() {
            "" => f.write_str(self.function_name),
            class => write!(f, "{class}::{}", self.function_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_class() {
        assert_eq!(
            CallContext::outbound("Noise", "get_noise_2d").to_string(),
            "Noise::get_noise_2d"
        );
        assert_eq!(CallContext::outbound("", "print").to_string(), "print");
        assert_eq!(CallContext::func("MySky", "_ready").to_string(), "MySky::_ready");
    }
}
