/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::class::func::{into_signature_info, make_method_registration, FuncDefinition};
use crate::util::{bail, retain_attributes_except, validate_impl, AttrArgs};
use crate::ParseResult;

/// `#[godot_api] impl MyClass`: registers the `#[func]` methods, leaves everything else alone.
pub fn transform_inherent_impl(mut decl: venial::Impl) -> ParseResult<TokenStream> {
    let class_name = validate_impl(&decl, None, "godot_api")?;
    let registrations: Vec<TokenStream> = take_funcs(&class_name, &mut decl)?
        .into_iter()
        .map(|func| make_method_registration(&class_name, func))
        .collect();

    let prv = super::private_path();
    Ok(quote! {
        #decl

        impl ::gdbind::obj::cap::ImplementsGodotApi for #class_name {
            fn __register_methods() {
                #( #registrations )*
            }
        }

        ::gdbind::sys::plugin_add!(__GDBIND_PLUGIN_REGISTRY in #prv; #prv::ClassPlugin::new::<#class_name>(
            #prv::PluginItem::Methods(#prv::MethodsItem::new::<#class_name>())
        ));
    })
}

/// Parses and strips `#[func]`, so the impl block compiles unchanged afterwards.
fn take_funcs(class_name: &Ident, decl: &mut venial::Impl) -> ParseResult<Vec<FuncDefinition>> {
    let mut funcs = Vec::new();

    for member in decl.body_items.iter_mut() {
        let venial::ImplMember::AssocFunction(function) = member else {
            continue;
        };
        let Some(mut args) = AttrArgs::find(&function.attributes, "func")? else {
            continue;
        };

        let rename = args.get_ident("rename")?.map(|name| name.to_string());
        args.done()?;

        let q = &function.qualifiers;
        if q.tk_const.is_some() || q.tk_async.is_some() || q.tk_unsafe.is_some() || q.tk_extern.is_some() {
            return bail("#[func] cannot be const, async, unsafe or extern", &function.name);
        }

        funcs.push(FuncDefinition {
            signature_info: into_signature_info(function, class_name)?,
            rename,
        });

        function.attributes = retain_attributes_except(&function.attributes, "func")
            .cloned()
            .collect();
    }

    Ok(funcs)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
