/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ops::BitOr;

use sys::interface_fn;

use crate::builtin::{StringName, Variant};
use crate::meta::{ClassName, GodotConvert, MethodParamOrReturnInfo, ParamTuple, Signature};
use crate::obj::GodotClass;
use crate::sys;

/// Flags describing a registered method, as in the engine's `MethodFlags`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodFlags {
    ord: u32,
}

impl MethodFlags {
    pub const NORMAL: Self = Self { ord: 1 };
    pub const EDITOR: Self = Self { ord: 2 };
    pub const CONST: Self = Self { ord: 4 };
    pub const VIRTUAL: Self = Self { ord: 8 };
    pub const VARARG: Self = Self { ord: 16 };
    pub const STATIC: Self = Self { ord: 32 };

    /// Flags of a plain `#[func]` without receiver qualifiers.
    pub const DEFAULT: Self = Self::NORMAL;

    pub const fn ord(self) -> u32 {
        self.ord
    }

    pub const fn is_set(self, flag: Self) -> bool {
        self.ord & flag.ord != 0
    }
}

impl BitOr for MethodFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            ord: self.ord | rhs.ord,
        }
    }
}

/// All info needed to register a `#[func]` method with the engine.
///
/// Built by generated code through [`from_signature()`][Self::from_signature].
pub struct ClassMethodInfo {
    class_name: ClassName,
    method_name: StringName,
    call_func: sys::GDExtensionClassMethodCall,
    ptrcall_func: sys::GDExtensionClassMethodPtrCall,
    method_flags: MethodFlags,
    return_value: Option<MethodParamOrReturnInfo>,
    arguments: Vec<MethodParamOrReturnInfo>,
    /// Default values of the last parameters, in declaration order.
    default_arguments: Vec<Variant>,
}

impl ClassMethodInfo {
    /// # Safety
    ///
    /// `call_func` and `ptrcall_func`, if provided, must:
    ///
    /// - Follow the behavior expected from the `method_flags` (e.g. if it's a static method, then they must not
    ///   access the instance).
    /// - Expect parameters of type `Params` and return `Ret`.
    pub unsafe fn from_signature<C: GodotClass, Params: ParamTuple, Ret: GodotConvert>(
        method_name: StringName,
        call_func: sys::GDExtensionClassMethodCall,
        ptrcall_func: sys::GDExtensionClassMethodPtrCall,
        method_flags: MethodFlags,
        param_names: &[&str],
        default_arguments: Vec<Variant>,
    ) -> Self {
        let return_value = Signature::<Params, Ret>::return_info();
        let arguments = Signature::<Params, Ret>::param_infos(param_names);

        assert!(
            default_arguments.len() <= arguments.len(),
            "cannot have more default arguments than arguments"
        );

        Self {
            class_name: C::class_name(),
            method_name,
            call_func,
            ptrcall_func,
            method_flags,
            return_value,
            arguments,
            default_arguments,
        }
    }

    pub fn register_extension_class_method(&self) {
        sys::out!("Register method:  {}::{}", self.class_name, self.method_name);

        let (mut return_value_sys, return_value_metadata) = match &self.return_value {
            Some(info) => (Some(info.info().property_sys()), info.metadata()),
            None => (None, 0),
        };

        let return_value_ptr = return_value_sys
            .as_mut()
            .map(|info| info as *mut sys::GDExtensionPropertyInfo)
            .unwrap_or(std::ptr::null_mut());

        let mut arguments_info_sys: Vec<sys::GDExtensionPropertyInfo> = self
            .arguments
            .iter()
            .map(|argument| argument.info().property_sys())
            .collect();

        let mut arguments_metadata: Vec<sys::GDExtensionClassMethodArgumentMetadata> =
            self.arguments.iter().map(|info| info.metadata()).collect();

        let mut default_arguments_sys: Vec<sys::GDExtensionVariantPtr> = self
            .default_arguments
            .iter()
            .map(|v| sys::force_mut_ptr(v.var_sys()))
            .collect();

        let method_info_sys = sys::GDExtensionClassMethodInfo {
            name: sys::force_mut_ptr(self.method_name.string_sys()),
            method_userdata: std::ptr::null_mut(),
            call_func: self.call_func,
            ptrcall_func: self.ptrcall_func,
            method_flags: self.method_flags.ord(),
            has_return_value: sys::bool_to_sys(self.return_value.is_some()),
            return_value_info: return_value_ptr,
            return_value_metadata,
            argument_count: to_u32(self.arguments.len()),
            arguments_info: arguments_info_sys.as_mut_ptr(),
            arguments_metadata: arguments_metadata.as_mut_ptr(),
            default_argument_count: to_u32(self.default_arguments.len()),
            default_arguments: default_arguments_sys.as_mut_ptr(),
        };

        // SAFETY: all pointers in `method_info_sys` refer to locals and fields that outlive the call; the engine copies them.
        unsafe {
            interface_fn!(classdb_register_extension_class_method)(
                sys::get_library(),
                self.class_name.string_sys(),
                std::ptr::addr_of!(method_info_sys),
            )
        }
    }
}

fn to_u32(len: usize) -> u32 {
    len.try_into()
        .unwrap_or_else(|_| panic!("argument count {len} does not fit in u32"))
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine() {
        let flags = MethodFlags::NORMAL | MethodFlags::CONST;

        assert_eq!(flags.ord(), 5);
        assert!(flags.is_set(MethodFlags::CONST));
        assert!(!flags.is_set(MethodFlags::STATIC));
        assert_eq!(MethodFlags::DEFAULT, MethodFlags::NORMAL);
    }
}
