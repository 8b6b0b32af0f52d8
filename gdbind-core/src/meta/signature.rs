/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![deny(unsafe_op_in_unsafe_fn)]

use std::marker::PhantomData;

use sys::GodotFfi;

use crate::builtin::Variant;
use crate::meta::error::{CallError, CallResult};
use crate::meta::{
    CallContext, FromGodot, GodotConvert, GodotType, InParamTuple, MethodParamOrReturnInfo,
    OutParamTuple, ParamTuple, ToGodot,
};
use crate::sys;

/// Static description of a function: its parameter tuple and return type.
///
/// Inbound calls (engine to Rust) need `Params: InParamTuple, Ret: ToGodot`. Outbound calls (Rust to engine) need
/// `Params: OutParamTuple, Ret: FromGodot`.
#[doc(hidden)]
pub struct Signature<Params, Ret> {
    _marker: PhantomData<fn(Params) -> Ret>,
}

impl<Params: ParamTuple, Ret: GodotConvert> Signature<Params, Ret> {
    /// Parameter infos in declaration order.
    ///
    /// # Panics
    /// If `param_names` does not have one entry per parameter.
    pub fn param_infos(param_names: &[&str]) -> Vec<MethodParamOrReturnInfo> {
        assert_eq!(
            param_names.len(),
            Params::LEN,
            "{} parameter names for {} parameters",
            param_names.len(),
            Params::LEN
        );

        (0..Params::LEN)
            .filter_map(|i| Params::param_info(i, param_names[i]))
            .collect()
    }

    pub fn return_info() -> Option<MethodParamOrReturnInfo> {
        Ret::Via::return_info()
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Inbound

impl<Params: InParamTuple, Ret: ToGodot> Signature<Params, Ret> {
    /// Handles a varcall from the engine; the result is written to `ret` as a `Variant`.
    ///
    /// # Safety
    /// Must only be invoked by the engine's varcall for a function registered with this signature.
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn in_varcall(
        instance_ptr: sys::GDExtensionClassInstancePtr,
        call_ctx: &CallContext,
        args_ptr: *const sys::GDExtensionConstVariantPtr,
        arg_count: i64,
        ret: sys::GDExtensionVariantPtr,
        err: *mut sys::GDExtensionCallError,
        func: impl FnOnce(sys::GDExtensionClassInstancePtr, Params) -> Ret,
    ) -> CallResult<()> {
        sys::out!("in_varcall: {call_ctx}");
        CallError::check_arg_count(call_ctx, arg_count as usize, Params::LEN)?;

        // SAFETY: `arg_count` was checked against the parameter count.
        let args = unsafe { Params::from_varcall_args(args_ptr, call_ctx)? };
        let variant = func(instance_ptr, args).to_variant();

        // SAFETY: the engine hands us an initialized return variant and a writable error struct.
        unsafe {
            *ret.cast::<Variant>() = variant;
            (*err).error = sys::GDEXTENSION_CALL_OK;
        }
        Ok(())
    }

    /// Handles a ptrcall from the engine; the result is moved into `ret` in its native layout.
    ///
    /// Virtual method dispatch uses [`PtrcallType::Virtual`](sys::PtrcallType::Virtual).
    ///
    /// # Safety
    /// Must only be invoked by the engine's ptrcall for a function registered with this signature.
    pub unsafe fn in_ptrcall(
        instance_ptr: sys::GDExtensionClassInstancePtr,
        call_ctx: &CallContext,
        args_ptr: *const sys::GDExtensionConstTypePtr,
        ret: sys::GDExtensionTypePtr,
        func: impl FnOnce(sys::GDExtensionClassInstancePtr, Params) -> Ret,
        call_type: sys::PtrcallType,
    ) -> CallResult<()> {
        sys::out!("in_ptrcall: {call_ctx}");

        // SAFETY: forwarded from caller.
        let args = unsafe { Params::from_ptrcall_args(args_ptr, call_type, call_ctx)? };
        let ffi = func(instance_ptr, args).to_godot().into_ffi();

        // SAFETY: `ret` is the engine's return slot for `Ret`.
        unsafe { ffi.move_return_ptr(ret, call_type) };
        Ok(())
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Outbound

impl<Params: OutParamTuple, Ret: FromGodot> Signature<Params, Ret> {
    /// Calls a class method through `object_method_bind_call`. Both `args` and `varargs` travel as variants.
    ///
    /// # Safety
    /// `method_bind` must accept these arguments and return `Ret`. `object_ptr` must be a live instance of its class.
    pub unsafe fn out_class_varcall(
        method_bind: sys::GDExtensionMethodBindPtr,
        class_name: &'static str,
        method_name: &'static str,
        object_ptr: sys::GDExtensionObjectPtr,
        args: Params,
        varargs: &[Variant],
    ) -> CallResult<Ret> {
        let call_ctx = CallContext::outbound(class_name, method_name);
        sys::out!("out_class_varcall: {call_ctx}");

        let bind_call = sys::interface_fn!(object_method_bind_call);

        let returned = args.with_variants(|explicit| {
            let frame: Vec<sys::GDExtensionConstVariantPtr> =
                explicit.iter().chain(varargs).map(Variant::var_sys).collect();
            let mut err = sys::default_call_error();

            // SAFETY: the frame points into `explicit` and `varargs`, both alive here.
            let variant = unsafe {
                Variant::new_with_var_uninit(|ret| {
                    bind_call(
                        method_bind,
                        object_ptr,
                        frame.as_ptr(),
                        frame.len() as i64,
                        ret,
                        &mut err,
                    )
                })
            };

            CallError::check_out_varcall(&call_ctx, err, explicit, varargs).map(|()| variant)
        })?;

        Ret::try_from_variant(&returned)
            .map_err(|err| CallError::failed_return_conversion::<Ret>(&call_ctx, err))
    }

    /// Calls a class method through `object_method_bind_ptrcall`.
    ///
    /// # Safety
    /// `method_bind` must accept these arguments and return `Ret`. `object_ptr` must be a live instance of its class.
    pub unsafe fn out_class_ptrcall(
        method_bind: sys::GDExtensionMethodBindPtr,
        class_name: &'static str,
        method_name: &'static str,
        object_ptr: sys::GDExtensionObjectPtr,
        args: Params,
    ) -> Ret {
        let call_ctx = CallContext::outbound(class_name, method_name);
        sys::out!("out_class_ptrcall: {call_ctx}");

        let bind_ptrcall = sys::interface_fn!(object_method_bind_ptrcall);

        // SAFETY: forwarded from caller.
        unsafe {
            Self::ptrcall_with(args, &call_ctx, |frame, ret| {
                bind_ptrcall(method_bind, object_ptr, frame.as_ptr(), ret)
            })
        }
    }

    /// Calls a method of a builtin type (`Array`, `String`, ...).
    ///
    /// # Safety
    /// `builtin_fn` must accept these arguments and return `Ret`. `type_ptr` must point to a live builtin value.
    pub unsafe fn out_builtin_ptrcall(
        builtin_fn: sys::BuiltinMethodBind,
        class_name: &'static str,
        method_name: &'static str,
        type_ptr: sys::GDExtensionTypePtr,
        args: Params,
    ) -> Ret {
        let call_ctx = CallContext::outbound(class_name, method_name);
        sys::out!("out_builtin_ptrcall: {call_ctx}");

        // SAFETY: forwarded from caller.
        unsafe {
            Self::ptrcall_with(args, &call_ctx, |frame, ret| {
                builtin_fn(type_ptr, frame.as_ptr(), ret, frame.len() as i32)
            })
        }
    }

    /// Calls a utility function taking varargs. Explicit arguments are native, varargs are `Variant` pointers.
    ///
    /// # Safety
    /// `utility_fn` must accept these arguments and return `Ret`.
    pub unsafe fn out_utility_ptrcall_varargs(
        utility_fn: sys::UtilityFunctionBind,
        function_name: &'static str,
        args: Params,
        varargs: &[Variant],
    ) -> Ret {
        let call_ctx = CallContext::outbound("", function_name);
        sys::out!("out_utility_ptrcall_varargs: {call_ctx}");

        // SAFETY: forwarded from caller.
        unsafe {
            Self::ptrcall_with(args, &call_ctx, |explicit, ret| {
                let frame: Vec<sys::GDExtensionConstTypePtr> = explicit
                    .iter()
                    .copied()
                    .chain(varargs.iter().map(GodotFfi::sys))
                    .collect();

                utility_fn(ret, frame.as_ptr(), frame.len() as i32)
            })
        }
    }

    /// Builds the ptrcall frame, lets `call` fill the return slot and converts the result.
    ///
    /// Returned objects are adopted as-is; the engine already counted the reference.
    ///
    /// # Safety
    /// `call` must initialize the return slot it is given, see [`GodotFfi::new_with_init`].
    unsafe fn ptrcall_with(
        args: Params,
        call_ctx: &CallContext,
        call: impl FnOnce(&[sys::GDExtensionConstTypePtr], sys::GDExtensionTypePtr),
    ) -> Ret {
        type RetFfi<R> = <<R as GodotConvert>::Via as GodotType>::Ffi;

        let ffi = args.with_type_pointers(|frame| {
            // SAFETY: forwarded from caller.
            unsafe { RetFfi::<Ret>::new_with_init(|ret| call(frame, ret)) }
        });

        match Ret::Via::try_from_ffi(ffi).and_then(Ret::try_from_godot) {
            Ok(value) => value,
            Err(err) => panic!(
                "`{call_ctx}` returned a value not convertible to {}: {err}",
                std::any::type_name::<Ret>()
            ),
        }
    }
}
