/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Global utility functions of the engine.
//!
//! Arguments are variants, printed space-less one after another like in GDScript.

use crate::builtin::Variant;
use crate::meta::error::CallError;
use crate::meta::{CallContext, Signature};
use crate::sys;

// Hash of `void f(Variant arg1, ...)`, shared by all printing utilities.
const VARARG_VOID_HASH: i64 = 2648703342;

/// Prints the concatenated arguments to standard output.
pub fn print(args: &[Variant]) {
    static FUNCTION: sys::FnPtrCell = sys::FnPtrCell::new();
    call_vararg_void(&FUNCTION, "print", args);
}

/// Reports an error to the debugger and the terminal.
pub fn push_error(args: &[Variant]) {
    static FUNCTION: sys::FnPtrCell = sys::FnPtrCell::new();
    call_vararg_void(&FUNCTION, "push_error", args);
}

/// Reports a warning to the debugger and the terminal.
pub fn push_warning(args: &[Variant]) {
    static FUNCTION: sys::FnPtrCell = sys::FnPtrCell::new();
    call_vararg_void(&FUNCTION, "push_warning", args);
}

fn call_vararg_void(cell: &sys::FnPtrCell, function_name: &'static str, args: &[Variant]) {
    let utility_fn = cell
        .utility_function(function_name, VARARG_VOID_HASH)
        .unwrap_or_else(|err| {
            let call_ctx = CallContext::outbound("", function_name);
            panic!("{}", CallError::failed_method_bind(&call_ctx, err))
        });

    // SAFETY: the function takes only varargs and returns nothing.
    unsafe {
        Signature::<(), ()>::out_utility_ptrcall_varargs(utility_fn, function_name, (), args);
    }
}
