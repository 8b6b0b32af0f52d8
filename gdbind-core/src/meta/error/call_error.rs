/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::error::Error;
use std::fmt;

use crate::builtin::{Variant, VariantType};
use crate::meta::error::ConvertError;
use crate::meta::CallContext;
use crate::sys;

/// Error code written to `GDExtensionCallError` for failures that the engine has no code for, such as panics.
pub(crate) const GDBIND_CUSTOM_CALL_ERROR: sys::GDExtensionCallErrorType = 40;

/// Error capable of representing failed function calls.
///
/// Returned from _varcall_ functions such as [`Object::try_call()`](crate::classes::Object::try_call), and used
/// internally when the engine calls a `#[func]` with wrong arguments. _Varcall_ refers to the "variant call" calling
/// convention, meaning that arguments and return values are passed as `Variant`.
///
/// # Possible error causes
/// - **Invalid method**: the method does not exist on the object.
/// - **Failed argument conversion**: the arguments cannot be converted to the declared parameter types.
/// - **Failed return value conversion**: the returned `Variant` cannot be converted to the expected type.
/// - **Too many or too few arguments**.
/// - **Instance is null**, or **method not const**, as reported by the engine.
/// - **User panic**: a Rust method caused a panic.
/// - **Method bind not found**: the engine does not provide a method with the expected name and hash.
pub struct CallError {
    // Boxed, to keep Result<..., CallError> small.
    b: Box<InnerCallError>,
}

#[derive(Debug)]
struct InnerCallError {
    class_name: String,
    function_name: String,
    call_expr: String,
    reason: String,
    source: Option<SourceError>,

    // Values reported back to the engine when a call into Rust fails.
    sys_code: sys::GDExtensionCallErrorType,
    sys_argument: i32,
    sys_expected: i32,
}

#[derive(Debug)]
enum SourceError {
    Convert(ConvertError),
    MethodBind(sys::MethodBindError),
}

impl CallError {
    // Naming:
    // - check_* means possible failure -- Result<(), Self> is returned.
    // - failed_* means definitive failure -- Self is returned.

    /// Name of the class/builtin whose method failed. **Not** the dynamic type.
    ///
    /// Returns `None` if this is a utility function (without a surrounding class/builtin).
    pub fn class_name(&self) -> Option<&str> {
        if self.b.class_name.is_empty() {
            None
        } else {
            Some(&self.b.class_name)
        }
    }

    /// Name of the function or method that failed.
    pub fn method_name(&self) -> &str {
        &self.b.function_name
    }

    // ------------------------------------------------------------------------------------------------------------------------------------------
    // Constructors returning Result<(), Self>; possible failure

    /// Checks whether number of arguments matches the number of parameters.
    pub(crate) fn check_arg_count(
        call_ctx: &CallContext,
        arg_count: usize,
        param_count: usize,
    ) -> Result<(), Self> {
        if arg_count == param_count {
            return Ok(());
        }

        Err(Self::failed_param_count(call_ctx, arg_count, param_count))
    }

    /// Checks the engine side of an outbound varcall (low-level `sys::GDExtensionCallError`).
    pub(crate) fn check_out_varcall(
        call_ctx: &CallContext,
        err: sys::GDExtensionCallError,
        explicit_args: &[Variant],
        varargs: &[Variant],
    ) -> Result<(), Self> {
        if err.error == sys::GDEXTENSION_CALL_OK {
            return Ok(());
        }

        let mut arg_types = Vec::with_capacity(explicit_args.len() + varargs.len());
        arg_types.extend(explicit_args.iter().map(Variant::get_type));
        arg_types.extend(varargs.iter().map(Variant::get_type));

        let explicit_args_str = join_args(explicit_args);
        let vararg_str = if varargs.is_empty() {
            String::new()
        } else {
            format!(", [va] {}", join_args(varargs))
        };

        let call_expr = format!("{call_ctx}({explicit_args_str}{vararg_str})");

        Err(Self::failed_varcall_inner(
            call_ctx,
            call_expr,
            err,
            &arg_types,
            explicit_args.len(),
        ))
    }

    // ------------------------------------------------------------------------------------------------------------------------------------------
    // Constructors returning Self; guaranteed failure

    /// Returns an error for a failed parameter conversion.
    pub(crate) fn failed_param_conversion<P>(
        call_ctx: &CallContext,
        param_index: isize,
        convert_error: ConvertError,
    ) -> Self {
        let param_ty = std::any::type_name::<P>();

        let mut call_error = Self::new(
            call_ctx,
            format!("parameter #{param_index} ({param_ty}) conversion"),
            Some(SourceError::Convert(convert_error)),
        );

        call_error.b.sys_code = sys::GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT;
        call_error.b.sys_argument = param_index as i32;
        call_error
    }

    fn failed_param_conversion_engine(
        call_ctx: &CallContext,
        param_index: i32,
        actual: VariantType,
        expected: VariantType,
    ) -> Self {
        let reason =
            format!("parameter #{param_index} -- cannot convert from {actual:?} to {expected:?}");

        Self::new(call_ctx, reason, None)
    }

    /// Returns an error for a failed return type conversion.
    pub(crate) fn failed_return_conversion<R>(
        call_ctx: &CallContext,
        convert_error: ConvertError,
    ) -> Self {
        let return_ty = std::any::type_name::<R>();

        Self::new(
            call_ctx,
            format!("return value {return_ty} conversion"),
            Some(SourceError::Convert(convert_error)),
        )
    }

    /// Returns an error for a method bind that the engine could not provide.
    pub fn failed_method_bind(call_ctx: &CallContext, error: sys::MethodBindError) -> Self {
        let mut call_error = Self::new(
            call_ctx,
            "method bind not available",
            Some(SourceError::MethodBind(error)),
        );

        call_error.b.sys_code = sys::GDEXTENSION_CALL_ERROR_INVALID_METHOD;
        call_error
    }

    fn failed_param_count(call_ctx: &CallContext, arg_count: usize, param_count: usize) -> Self {
        let param_plural = plural(param_count);
        let arg_plural = plural(arg_count);

        let mut call_error = Self::new(
            call_ctx,
            format!(
                "function has {param_count} parameter{param_plural}, but received {arg_count} argument{arg_plural}"
            ),
            None,
        );

        call_error.b.sys_code = if arg_count > param_count {
            sys::GDEXTENSION_CALL_ERROR_TOO_MANY_ARGUMENTS
        } else {
            sys::GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS
        };
        call_error.b.sys_expected = param_count as i32;
        call_error
    }

    fn failed_varcall_inner(
        call_ctx: &CallContext,
        call_expr: String,
        err: sys::GDExtensionCallError,
        arg_types: &[VariantType],
        vararg_offset: usize,
    ) -> Self {
        // This specializes on reflection-style calls, e.g. call(). In these cases, varargs are the _actual_
        // arguments, with required args being metadata such as the method name.

        debug_assert_ne!(err.error, sys::GDEXTENSION_CALL_OK); // already checked outside

        let sys::GDExtensionCallError {
            error,
            argument,
            expected,
        } = err;

        let mut call_error = match error {
            sys::GDEXTENSION_CALL_ERROR_INVALID_METHOD => {
                Self::new(call_ctx, "method not found", None)
            }
            sys::GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT => {
                let to = VariantType::from_sys(expected as sys::GDExtensionVariantType);
                let i = argument + 1;

                match arg_types.get(vararg_offset + argument as usize) {
                    Some(&from) => Self::failed_param_conversion_engine(call_ctx, i, from, to),
                    None => Self::new(call_ctx, format!("parameter #{i} -- invalid argument"), None),
                }
            }
            sys::GDEXTENSION_CALL_ERROR_TOO_MANY_ARGUMENTS
            | sys::GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS => {
                let arg_count = arg_types.len().saturating_sub(vararg_offset);
                let param_count = expected as usize;
                Self::failed_param_count(call_ctx, arg_count, param_count)
            }
            sys::GDEXTENSION_CALL_ERROR_INSTANCE_IS_NULL => {
                Self::new(call_ctx, "instance is null", None)
            }
            sys::GDEXTENSION_CALL_ERROR_METHOD_NOT_CONST => {
                Self::new(call_ctx, "method is not const", None)
            }
            _ => Self::new(
                call_ctx,
                format!("unknown reason (error code {error})"),
                None,
            ),
        };

        call_error.b.sys_code = error;
        call_error.b.sys_argument = argument;
        call_error.b.sys_expected = expected;
        call_error.b.call_expr = call_expr;
        call_error
    }

    #[doc(hidden)]
    pub fn failed_by_user_panic(call_ctx: &CallContext, panic_message: String) -> Self {
        Self::new(call_ctx, format!("function panicked: {panic_message}"), None)
    }

    fn new(call_ctx: &CallContext, reason: impl Into<String>, source: Option<SourceError>) -> Self {
        let inner = InnerCallError {
            class_name: call_ctx.class_name.to_string(),
            function_name: call_ctx.function_name.to_string(),
            call_expr: format!("{call_ctx}()"),
            reason: reason.into(),
            source,
            sys_code: GDBIND_CUSTOM_CALL_ERROR,
            sys_argument: -1,
            sys_expected: -1,
        };

        Self { b: Box::new(inner) }
    }

    /// Low-level error as reported back to the engine, when a call into Rust fails.
    #[doc(hidden)]
    pub fn to_sys_error(&self) -> sys::GDExtensionCallError {
        sys::GDExtensionCallError {
            error: self.b.sys_code,
            argument: self.b.sys_argument,
            expected: self.b.sys_expected,
        }
    }

    /// Describes the error.
    ///
    /// This is the same as the `Display`/`ToString` repr, but without the prefix mentioning that this is a function
    /// call error. Source error information is appended if `with_source` is true.
    pub fn message(&self, with_source: bool) -> String {
        let InnerCallError {
            call_expr,
            reason,
            source,
            ..
        } = &*self.b;

        let reason_str = if reason.is_empty() {
            String::new()
        } else {
            format!("\n    Reason: {reason}")
        };

        let source_str = match source {
            Some(SourceError::Convert(e)) if with_source => format!("\n  Source: {e}"),
            Some(SourceError::MethodBind(e)) if with_source => format!("\n  Source: {e}"),
            _ => String::new(),
        };

        format!("{call_expr}{reason_str}{source_str}")
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message(true);
        write!(f, "gdbind function call failed: {message}")
    }
}

impl fmt::Debug for CallError {
    // Delegate to inner box.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.b)
    }
}

impl Error for CallError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.b.source.as_ref() {
            Some(SourceError::Convert(e)) => Some(e),
            Some(SourceError::MethodBind(e)) => Some(e),
            None => None,
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Utilities

fn join_args(args: &[Variant]) -> String {
    args.iter()
        .map(|arg| format!("{arg:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
