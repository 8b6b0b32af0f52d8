/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! `#[derive(GodotClass)]` and `#[godot_api]`.

mod derive;
mod field;
mod func;
mod inherent_impl;
mod interface_impl;

use proc_macro2::TokenStream;

use crate::util::bail;
use crate::ParseResult;

pub(crate) use derive::derive_godot_class;

/// Dispatches `#[godot_api]` to the inherent or the interface trait variant.
pub fn attribute_godot_api(meta: TokenStream, item: venial::Item) -> ParseResult<TokenStream> {
    let venial::Item::Impl(decl) = item else {
        return bail("#[godot_api] can only be applied on impl blocks", item);
    };

    if !meta.is_empty() {
        return bail("#[godot_api] takes no arguments", meta);
    }
    if decl.impl_generic_params.is_some() {
        return bail("#[godot_api] does not support lifetimes or generic parameters", &decl);
    }

    match decl.trait_ty {
        Some(_) => interface_impl::transform_interface_impl(decl),
        None => inherent_impl::transform_inherent_impl(decl),
    }
}

/// Path of the runtime support items that generated code refers to.
fn private_path() -> TokenStream {
    quote::quote! { ::gdbind::private }
}
