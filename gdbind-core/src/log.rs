/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Printing and logging to the engine console.
//!
//! Before the binding is initialized (e.g. in unit tests), messages go to stderr instead.

pub use crate::{godot_error, godot_print, godot_script_error, godot_warn};

// https://stackoverflow.com/a/40234666
#[macro_export]
#[doc(hidden)]
macro_rules! inner_function {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! inner_godot_msg {
    ($godot_fn:ident; $fmt:literal $(, $args:expr)* $(,)?) => {{
        let msg = format!("{}\0", format_args!($fmt $(, $args)*));

        if $crate::sys::is_initialized() {
            let function = format!("{}\0", $crate::inner_function!());

            // SAFETY: all strings are null-terminated and outlive the call.
            unsafe {
                $crate::sys::interface_fn!($godot_fn)(
                    $crate::sys::c_str_from_str(&msg),
                    $crate::sys::c_str_from_str(&function),
                    $crate::sys::c_str_from_str(concat!(file!(), "\0")),
                    line!() as i32,
                    $crate::sys::bool_to_sys(false), // editor toast
                );
            }
        } else {
            eprintln!("[{}] {}", stringify!($godot_fn), &msg[..msg.len() - 1]);
        }
    }};
}

/// Pushes a warning message to the engine debugger and the terminal.
///
/// _Godot equivalent: `push_warning()`_.
#[macro_export]
macro_rules! godot_warn {
    ($fmt:literal $(, $args:expr)* $(,)?) => {
        $crate::inner_godot_msg!(print_warning; $fmt $(, $args)*)
    };
}

/// Pushes an error message to the engine debugger and the terminal.
///
/// _Godot equivalent: `push_error()`_.
#[macro_export]
macro_rules! godot_error {
    ($fmt:literal $(, $args:expr)* $(,)?) => {
        $crate::inner_godot_msg!(print_error; $fmt $(, $args)*)
    };
}

/// Logs a script error to the engine debugger and the terminal.
#[macro_export]
macro_rules! godot_script_error {
    ($fmt:literal $(, $args:expr)* $(,)?) => {
        $crate::inner_godot_msg!(print_script_error; $fmt $(, $args)*)
    };
}

/// Prints to the engine console.
///
/// _Godot equivalent: `print()`_.
#[macro_export]
macro_rules! godot_print {
    ($fmt:literal $(, $args:expr)* $(,)?) => {
        if $crate::sys::is_initialized() {
            $crate::classes::utilities::print(&[
                $crate::builtin::Variant::from(format!($fmt $(, $args)*))
            ])
        } else {
            println!($fmt $(, $args)*)
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn inner_function_names_enclosing_fn() {
        let name = crate::inner_function!();
        assert!(
            name.ends_with("tests::inner_function_names_enclosing_fn"),
            "{name}"
        );
    }

    #[test]
    fn messages_fall_back_to_stderr() {
        // The binding is never initialized in unit tests.
        godot_warn!("warning {}", 1);
        godot_error!("error {}", 2);
        godot_script_error!("script error");
        godot_print!("print {}", 3);
    }
}
