/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Items used by generated code. Not part of the public API.

pub use crate::registry::method::{ClassMethodInfo, MethodFlags};
pub use crate::registry::plugin::{ClassItem, ClassPlugin, MethodsItem, PluginItem, VirtualsItem};
pub use crate::registry::class::registered_classes;
pub use crate::registry::property::register_var;
pub use crate::storage::{as_storage, InstanceStorage};
pub use sys::out;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, UnwindSafe};

use crate::godot_error;
use crate::meta::error::CallError;
use crate::meta::CallContext;
use crate::sys;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Plugins

sys::plugin_registry!(pub __GDBIND_PLUGIN_REGISTRY: ClassPlugin);

pub(crate) fn iterate_plugins(mut visitor: impl FnMut(&ClassPlugin)) {
    sys::plugin_foreach!(__GDBIND_PLUGIN_REGISTRY; visitor);
}

// Turns a forgotten #[godot_api] on an interface impl into a compile error instead of silently ignored callbacks.
#[allow(non_camel_case_types)]
#[diagnostic::on_unimplemented(
    message = "`impl` blocks for Godot classes require the `#[godot_api]` attribute",
    label = "missing `#[godot_api]` before `impl`"
)]
pub trait You_forgot_the_attribute__godot_api {}

/// Whether a non-tool class must stay passive because it runs inside the editor.
///
/// Such classes are registered and constructible, but the engine never sees their overridden callbacks.
pub fn is_class_inactive(is_tool: bool) -> bool {
    if is_tool {
        return false;
    }

    // SAFETY: only invoked after global library initialization.
    let config = unsafe { sys::config() };
    config.tool_only_in_editor
        && config.is_editor_or_init(|| {
            use crate::obj::Singleton as _;
            crate::classes::Engine::singleton().is_editor_hint()
        })
}

pub fn flush_stdout() {
    use std::io::Write as _;

    // Nothing sensible to do if stdout is gone.
    let _ = std::io::stdout().flush();
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Panics

thread_local! {
    /// Where the most recent panic on this thread happened, recorded by the hook in `catch_reported`.
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// A caught panic: its payload text and, if the hook saw it, the source location.
struct PanicReport {
    location: Option<String>,
    message: String,
}

impl PanicReport {
    /// `[panic]` prefix, with multi-line messages starting on their own indented line.
    fn indented_message(&self) -> String {
        if self.message.contains('\n') {
            format!("[panic]\n  {}", self.message.replace('\n', "\n  "))
        } else {
            format!("[panic]  {}", self.message)
        }
    }

    fn log(&self, context: impl fmt::Display) {
        match &self.location {
            Some(at) => godot_error!("Rust function panicked at {at}.\n  Context: {context}"),
            None => godot_error!("Rust function panicked.\n  Context: {context}"),
        }
        godot_error!("{}", self.indented_message());
    }
}

/// Text of a panic payload. Payloads other than `&str` and `String` are described by their type ID.
pub fn extract_panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        format!("(panic of type ID {:?})", payload.type_id())
    }
}

/// Runs `code`, turning a panic into `Err`. The hook is swapped for the duration so that the location is recorded
/// instead of printed to stderr.
fn catch_reported<F, R>(code: F) -> Result<R, PanicReport>
where
    F: FnOnce() -> R + UnwindSafe,
{
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        let at = info.location().map(|loc| format!("{}:{}", loc.file(), loc.line()));
        PANIC_LOCATION.with(|cell| *cell.borrow_mut() = at);
    }));

    let outcome = panic::catch_unwind(code);
    panic::set_hook(previous_hook);

    outcome.map_err(|payload| {
        // Earlier Rust output belongs before the error.
        flush_stdout();

        PanicReport {
            location: PANIC_LOCATION.with(|cell| cell.borrow_mut().take()),
            message: extract_panic_message(payload.as_ref()),
        }
    })
}

/// Executes `code`; a panic is logged to the engine together with `error_context` and returned as `Err(message)`.
pub fn handle_panic<E, F, R, S>(error_context: E, code: F) -> Result<R, String>
where
    E: FnOnce() -> S,
    F: FnOnce() -> R + UnwindSafe,
    S: fmt::Display,
{
    catch_reported(code).map_err(|report| {
        report.log(error_context());
        report.indented_message()
    })
}

/// Runs a varcall into Rust. Panics and call errors are logged and written to `out_err`.
pub fn handle_varcall_panic<F, R>(call_ctx: &CallContext, out_err: &mut sys::GDExtensionCallError, code: F)
where
    F: FnOnce() -> Result<R, CallError> + UnwindSafe,
{
    if let Some(error) = call_failure(call_ctx, code) {
        godot_error!("{error}");
        *out_err = error.to_sys_error();
    }
}

/// Runs a ptrcall into Rust, including overridden engine callbacks. Ptrcalls have no error channel, so failures
/// are only logged.
pub fn handle_ptrcall_panic<F, R>(call_ctx: &CallContext, code: F)
where
    F: FnOnce() -> Result<R, CallError> + UnwindSafe,
{
    if let Some(error) = call_failure(call_ctx, code) {
        godot_error!("{error}");
    }
}

fn call_failure<F, R>(call_ctx: &CallContext, code: F) -> Option<CallError>
where
    F: FnOnce() -> Result<R, CallError> + UnwindSafe,
{
    match catch_reported(code) {
        Ok(Ok(_)) => None,
        Ok(Err(rejected)) => Some(rejected),
        Err(report) => Some(CallError::failed_by_user_panic(call_ctx, report.indented_message())),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn report(message: &str) -> PanicReport {
        PanicReport {
            location: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn single_line_message_stays_inline() {
        assert_eq!(report("boom").indented_message(), "[panic]  boom");
    }

    #[test]
    fn multi_line_message_is_indented() {
        assert_eq!(report("first\nsecond").indented_message(), "[panic]\n  first\n  second");
    }

    #[test]
    fn payload_text() {
        let static_str: Box<dyn Any + Send> = Box::new("fixed");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(17_u8);

        assert_eq!(extract_panic_message(static_str.as_ref()), "fixed");
        assert_eq!(extract_panic_message(owned.as_ref()), "owned");
        assert!(extract_panic_message(other.as_ref()).starts_with("(panic of type ID"));
    }

    #[test]
    fn caught_panic_keeps_message() {
        let caught: Result<(), PanicReport> = catch_reported(|| panic!("custom {}", 42));
        let Err(report) = caught else {
            panic!("panic was not caught");
        };

        assert_eq!(report.message, "custom 42");
    }

    #[test]
    fn call_without_failure() {
        let ctx = CallContext::func("Spawner", "spawn");
        assert!(call_failure(&ctx, || -> Result<i32, CallError> { Ok(1) }).is_none());
    }

    #[test]
    fn panicking_call_is_a_failure() {
        let ctx = CallContext::func("Spawner", "spawn");
        let failure = call_failure(&ctx, || -> Result<(), CallError> { panic!("oops") });

        assert!(failure.is_some());
    }
}
