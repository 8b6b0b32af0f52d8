/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! # Internal crate of [**gdbind**](https://docs.rs/gdbind)
//!
//! Do not depend on this crate directly, instead use the `gdbind` crate.
//! No SemVer or other guarantees are provided.

mod class;
mod gdextension;
mod itest;
mod util;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

use crate::util::ident;

type ParseResult<T> = Result<T, venial::Error>;

/// Implements [`GodotClass`](../obj/trait.GodotClass.html) for a struct and registers it with the engine.
///
/// `#[godot_api]` blocks add methods and engine callbacks on top.
///
/// # `#[class(...)]`
///
/// | Key | Effect |
/// |---|---|
/// | `base = Node` | Engine base class. Defaults to `RefCounted`. |
/// | `init` | Generated constructor: every field gets `#[init(val = ...)]` or `Default::default()`. |
/// | `no_init` | The engine cannot construct the class; `MyClass.new()` fails in GDScript. |
/// | `tool` | Engine callbacks also run inside the editor. |
/// | `rename = Name` | Registered class name, if it should differ from the struct name. |
///
/// Without `init` or `no_init`, the interface trait impl (`INode`, `IRefCounted`, ...) is expected to override `init()`.
///
/// # Fields
///
/// The base object is kept in a `Base<T>` field, named `base` or marked `#[base]`. It gives access to `self.base()`
/// and `self.base_mut()`.
///
/// ```no_run
/// use gdbind::prelude::*;
///
/// #[derive(GodotClass)]
/// #[class(init, base = Node)]
/// struct Player {
///     base: Base<Node>,
///
///     #[init(val = 100)]
///     #[var]
///     health: i64,
///
///     #[var(get)]
///     kills: i64,
/// }
/// ```
///
/// # Properties
///
/// `#[var]` makes a field a property, reachable through `Object.get()`, `Object.set()` and GDScript member syntax.
/// The accessors are generated as `get_<field>` and `set_<field>` methods.
///
/// - `#[var(get)]` generates only the getter: a read-only property.
/// - `#[var(get = f, set = g)]` uses `#[func]` methods `f` and `g` instead. Use the Rust name, even if the method
///   is renamed.
/// - Naming just one of `get`/`set` leaves out the other side. A setter alone is an error.
///
/// The field type must implement `ToGodot` and `FromGodot`. Properties are not stored in scenes and not shown in the
/// inspector.
#[proc_macro_derive(GodotClass, attributes(class, base, init, var))]
pub fn derive_godot_class(input: TokenStream) -> TokenStream {
    translate(input, class::derive_godot_class)
}

/// Registers the methods or engine callbacks of a [`#[derive(GodotClass)]`](derive.GodotClass.html) struct.
///
/// # Inherent impl: `#[func]`
///
/// Each `#[func]` method becomes callable from GDScript and through `Object.call()`. The receiver is `&self`,
/// `&mut self`, or absent for static functions. `#[func(rename = name)]` registers it under another name.
///
/// ```no_run
/// # use gdbind::prelude::*;
/// # #[derive(GodotClass)]
/// # #[class(init)]
/// # struct Counter { remaining: i64 }
/// #[godot_api]
/// impl Counter {
///     #[func]
///     fn decrement(&mut self) -> i64 {
///         self.remaining -= 1;
///         self.remaining
///     }
///
///     #[func]
///     fn describe(limit: i64) -> GString {
///         GString::from(format!("counts to {limit}"))
///     }
/// }
/// ```
///
/// # Interface trait impl: engine callbacks
///
/// Every engine class has an interface trait, such as `INode` for `Node`, with the callbacks a user class may override.
/// Callbacks left out of the impl keep the engine's default behavior.
///
/// ```no_run
/// # use gdbind::prelude::*;
/// #[derive(GodotClass)]
/// #[class(base = Node)]
/// struct Ticker {
///     ticks: u64,
///     base: Base<Node>,
/// }
///
/// #[godot_api]
/// impl INode for Ticker {
///     fn init(base: Base<Node>) -> Self {
///         Self { ticks: 0, base }
///     }
///
///     fn process(&mut self, _delta: f64) {
///         self.ticks += 1;
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn godot_api(meta: TokenStream, input: TokenStream) -> TokenStream {
    translate(input, |body| class::attribute_godot_api(TokenStream2::from(meta), body))
}

/// Marks the `unsafe impl ExtensionLibrary` of a crate and emits the `extern "C"` function the engine loads.
///
/// The symbol is `gdext_rust_init` unless `#[gdextension(entry_symbol = name)]` says otherwise. It has to match the
/// `entry_symbol` in the `.gdextension` file. See [`ExtensionLibrary`](../init/trait.ExtensionLibrary.html).
#[proc_macro_attribute]
pub fn gdextension(meta: TokenStream, input: TokenStream) -> TokenStream {
    translate_meta("gdextension", meta, input, gdextension::attribute_gdextension)
}

/// Declares an integration test, run inside the engine. Only usable in the repository's own test crate.
#[doc(hidden)]
#[proc_macro_attribute]
pub fn itest(meta: TokenStream, input: TokenStream) -> TokenStream {
    translate_meta("itest", meta, input, itest::attribute_itest)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Implementation

/// Turns parse or expansion errors into `compile_error!` invocations.
fn emit(result: ParseResult<TokenStream2>) -> TokenStream {
    result.unwrap_or_else(|err| err.to_compile_error()).into()
}

/// Derives, and attribute macros that look at their arguments themselves.
fn translate<F>(input: TokenStream, transform: F) -> TokenStream
where
    F: FnOnce(venial::Item) -> ParseResult<TokenStream2>,
{
    emit(venial::parse_item(input.into()).and_then(transform))
}

/// Attribute macros whose arguments are read with [`util::AttrArgs`]: the attribute is put back on the item first.
fn translate_meta<F>(self_name: &str, meta: TokenStream, input: TokenStream, transform: F) -> TokenStream
where
    F: FnOnce(venial::Item) -> ParseResult<TokenStream2>,
{
    let item = util::venial_parse_meta(&meta.into(), ident(self_name), &input.into());
    emit(item.and_then(transform))
}
