/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Parameter lists as Rust tuples, and how they are laid out in a call frame.
//!
//! A call frame is the array of pointers handed to the engine (outbound) or received from it (inbound). For ptrcalls
//! each pointer addresses a value in its native layout, for varcalls each pointer addresses a `Variant`.

#![deny(unsafe_op_in_unsafe_fn)]

use sys::GodotFfi;

use crate::builtin::Variant;
use crate::meta::error::{CallError, CallResult};
use crate::meta::{CallContext, FromGodot, GodotConvert, GodotType, MethodParamOrReturnInfo, ToGodot};
use crate::sys;

/// Tuple of function parameters, one element per parameter.
pub trait ParamTuple: Sized {
    const LEN: usize;

    /// Registration info for the parameter at `index`, or `None` past the end.
    #[doc(hidden)]
    fn param_info(index: usize, param_name: &str) -> Option<MethodParamOrReturnInfo>;
}

/// Parameters of a function the engine calls into, such as a `#[func]` or a virtual method.
pub trait InParamTuple: ParamTuple {
    /// # Safety
    /// `args_ptr` must address [`LEN`](ParamTuple::LEN) pointers, each reborrowable as `&Variant` during the call.
    #[doc(hidden)]
    unsafe fn from_varcall_args(
        args_ptr: *const sys::GDExtensionConstVariantPtr,
        call_ctx: &CallContext,
    ) -> CallResult<Self>;

    /// # Safety
    /// `args_ptr` must address [`LEN`](ParamTuple::LEN) pointers, the `i`-th one encoding the `i`-th element
    /// according to `call_type`.
    #[doc(hidden)]
    unsafe fn from_ptrcall_args(
        args_ptr: *const sys::GDExtensionConstTypePtr,
        call_type: sys::PtrcallType,
        call_ctx: &CallContext,
    ) -> CallResult<Self>;
}

/// Arguments of an engine function called from Rust.
pub trait OutParamTuple: ParamTuple {
    /// Passes the arguments to `f` as variants.
    fn with_variants<F, R>(self, f: F) -> R
    where
        F: FnOnce(&[Variant]) -> R;

    /// Passes a ptrcall frame to `f`. The arguments stay alive until `f` returns.
    #[doc(hidden)]
    fn with_type_pointers<F, R>(self, f: F) -> R
    where
        F: FnOnce(&[sys::GDExtensionConstTypePtr]) -> R;
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Tuple implementations

macro_rules! impl_param_tuples {
    ($( $len:literal => ( $($P:ident . $n:tt),* ); )*) => {$(
        impl<$($P: GodotConvert),*> ParamTuple for ($($P,)*) {
            const LEN: usize = $len;

            #[allow(unused_variables)]
            fn param_info(index: usize, param_name: &str) -> Option<MethodParamOrReturnInfo> {
                match index {
                    $( $n => Some($P::Via::argument_info(param_name)), )*
                    _ => None,
                }
            }
        }

        impl<$($P: FromGodot),*> InParamTuple for ($($P,)*) {
            #[allow(unused_variables)]
            unsafe fn from_varcall_args(
                args_ptr: *const sys::GDExtensionConstVariantPtr,
                call_ctx: &CallContext,
            ) -> CallResult<Self> {
                // SAFETY: forwarded from caller.
                let frame = unsafe { frame(args_ptr, $len) };

                // SAFETY: each element is a variant borrowed for this call.
                Ok(($( unsafe { decode_variant::<$P>(frame[$n], call_ctx, $n)? }, )*))
            }

            #[allow(unused_variables)]
            unsafe fn from_ptrcall_args(
                args_ptr: *const sys::GDExtensionConstTypePtr,
                call_type: sys::PtrcallType,
                call_ctx: &CallContext,
            ) -> CallResult<Self> {
                // SAFETY: forwarded from caller.
                let frame = unsafe { frame(args_ptr, $len) };

                // SAFETY: the `$n`-th element encodes `$P`.
                Ok(($( unsafe { decode_native::<$P>(frame[$n], call_type, call_ctx, $n)? }, )*))
            }
        }

        impl<$($P: ToGodot),*> OutParamTuple for ($($P,)*) {
            fn with_variants<F, R>(self, f: F) -> R
            where
                F: FnOnce(&[Variant]) -> R,
            {
                let variants: [Variant; $len] = [$( self.$n.to_variant() ),*];
                f(&variants)
            }

            fn with_type_pointers<F, R>(self, f: F) -> R
            where
                F: FnOnce(&[sys::GDExtensionConstTypePtr]) -> R,
            {
                // The frame points into `owned`.
                let owned = ($( self.$n.to_godot().into_ffi(), )*);
                let frame: [sys::GDExtensionConstTypePtr; $len] = [$( owned.$n.as_arg_ptr() ),*];
                f(&frame)
            }
        }
    )*};
}

impl_param_tuples! {
    0 => ();
    1 => (P0.0);
    2 => (P0.0, P1.1);
    3 => (P0.0, P1.1, P2.2);
    4 => (P0.0, P1.1, P2.2, P3.3);
    5 => (P0.0, P1.1, P2.2, P3.3, P4.4);
    6 => (P0.0, P1.1, P2.2, P3.3, P4.4, P5.5);
    7 => (P0.0, P1.1, P2.2, P3.3, P4.4, P5.5, P6.6);
    8 => (P0.0, P1.1, P2.2, P3.3, P4.4, P5.5, P6.6, P7.7);
}

/// Views an engine-provided pointer array as a slice. The engine may pass null for empty frames.
///
/// # Safety
/// Unless `len` is 0, `ptr` must address `len` initialized elements that outlive `'a`.
unsafe fn frame<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if len == 0 {
        &[]
    } else {
        // SAFETY: forwarded from caller.
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

/// # Safety
/// `arg` must be reborrowable as `&Variant` for the duration of the call.
unsafe fn decode_variant<P: FromGodot>(
    arg: sys::GDExtensionConstVariantPtr,
    call_ctx: &CallContext,
    index: isize,
) -> CallResult<P> {
    // SAFETY: forwarded from caller.
    let variant = unsafe { Variant::borrow_var_sys(arg) };

    P::try_from_variant(variant)
        .map_err(|err| CallError::failed_param_conversion::<P>(call_ctx, index, err))
}

/// # Safety
/// `arg` must encode `P::Via`, see [`GodotFfi::from_arg_ptr`].
unsafe fn decode_native<P: FromGodot>(
    arg: sys::GDExtensionConstTypePtr,
    call_type: sys::PtrcallType,
    call_ctx: &CallContext,
    index: isize,
) -> CallResult<P> {
    type Ffi<P> = <<P as GodotConvert>::Via as GodotType>::Ffi;

    // SAFETY: forwarded from caller.
    let ffi = unsafe { Ffi::<P>::from_arg_ptr(sys::force_mut_ptr(arg), call_type) };

    P::Via::try_from_ffi(ffi)
        .and_then(P::try_from_godot)
        .map_err(|err| CallError::failed_param_conversion::<P>(call_ctx, index, err))
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_len() {
        assert_eq!(<() as ParamTuple>::LEN, 0);
        assert_eq!(<(i32, f64) as ParamTuple>::LEN, 2);
        assert_eq!(<(bool, bool, bool, bool, bool, bool, bool, bool) as ParamTuple>::LEN, 8);
    }

    #[test]
    fn param_info_past_end() {
        assert!(<(i64,) as ParamTuple>::param_info(1, "seed").is_none());
        assert!(<() as ParamTuple>::param_info(0, "seed").is_none());
    }

    #[test]
    fn empty_frame_accepts_null() {
        let ptr: *const sys::GDExtensionConstVariantPtr = std::ptr::null();

        // SAFETY: length 0 never dereferences.
        let slice = unsafe { frame(ptr, 0) };
        assert!(slice.is_empty());
    }
}
