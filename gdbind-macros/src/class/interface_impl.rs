/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::{quote, ToTokens};

use crate::class::func::{into_signature_info, make_virtual_callback};
use crate::util::validate_trait_impl_virtual;
use crate::ParseResult;

/// `#[godot_api] impl IBase for MyClass`: builds the virtual-dispatch table.
///
/// `init`, `to_string` and `on_notification` are not dispatched by name; each becomes a capability trait impl plus a
/// builder call on the plugin item.
pub fn transform_interface_impl(decl: venial::Impl) -> ParseResult<TokenStream> {
    let (class_name, trait_ty) = validate_trait_impl_virtual(&decl, "godot_api")?;
    let trait_path = trait_ty.to_token_stream();
    let prv = super::private_path();

    let mut item = quote! { #prv::VirtualsItem::new::<#class_name>() };
    let mut capabilities = Vec::new();
    let mut dispatch_arms = Vec::new();

    for member in decl.body_items.iter() {
        let venial::ImplMember::AssocFunction(method) = member else {
            continue;
        };

        let rust_name = method.name.to_string();
        match special_method(&class_name, &trait_path, &rust_name) {
            Some((capability, builder)) => {
                capabilities.push(capability);
                item = quote! { #item.#builder::<#class_name>() };
            }
            None => {
                // ready -> _ready
                let godot_name = format!("_{rust_name}");
                let signature_info = into_signature_info(method, &class_name)?;
                let callback = make_virtual_callback(&class_name, &trait_path, &signature_info, &godot_name);
                dispatch_arms.push(quote! { #godot_name => #callback, });
            }
        }
    }

    Ok(quote! {
        #decl
        #( #capabilities )*

        impl #prv::You_forgot_the_attribute__godot_api for #class_name {}

        impl ::gdbind::obj::cap::ImplementsGodotVirtual for #class_name {
            fn __virtual_call(name: &str) -> ::gdbind::sys::GDExtensionClassCallVirtual {
                match name {
                    #( #dispatch_arms )*
                    _ => None,
                }
            }
        }

        ::gdbind::sys::plugin_add!(__GDBIND_PLUGIN_REGISTRY in #prv; #prv::ClassPlugin::new::<#class_name>(
            #prv::PluginItem::Virtuals(#item)
        ));
    })
}

/// Capability impl and `VirtualsItem` builder for the methods with dedicated engine hooks.
fn special_method(class_name: &Ident, trait_path: &TokenStream, rust_name: &str) -> Option<(TokenStream, Ident)> {
    let cap = quote! { ::gdbind::obj::cap };

    let (capability, builder) = match rust_name {
        "init" => (
            quote! {
                impl #cap::GodotDefault for #class_name {
                    fn __godot_user_init(base: ::gdbind::obj::Base<Self::Base>) -> Self {
                        <Self as #trait_path>::init(base)
                    }
                }
            },
            "with_init",
        ),
        "to_string" => (
            quote! {
                impl #cap::GodotToString for #class_name {
                    fn __godot_to_string(&self) -> ::gdbind::builtin::GString {
                        <Self as #trait_path>::to_string(self)
                    }
                }
            },
            "with_to_string",
        ),
        "on_notification" => (
            quote! {
                impl #cap::GodotNotification for #class_name {
                    fn __godot_notification(&mut self, what: i32) {
                        let what = ::gdbind::classes::ObjectNotification::from_ord(what);
                        <Self as #trait_path>::on_notification(self, what)
                    }
                }
            },
            "with_on_notification",
        ),
        _ => return None,
    };

    Some((capability, crate::util::ident(builder)))
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(tokens: TokenStream) -> ParseResult<String> {
        match venial::parse_item(tokens) {
            Ok(venial::Item::Impl(decl)) => transform_interface_impl(decl).map(|ts| ts.to_string()),
            other => panic!("expected impl, got {other:?}"),
        }
    }

    #[test]
    fn special_methods_become_capabilities() {
        let out = transform(quote! {
            impl INode for Player {
                fn init(base: Base<Node>) -> Self { todo!() }
                fn to_string(&self) -> GString { todo!() }
                fn on_notification(&mut self, what: ObjectNotification) {}
            }
        })
        .expect("valid impl");

        assert!(out.contains("GodotDefault for Player"));
        assert!(out.contains("GodotToString for Player"));
        assert!(out.contains("GodotNotification for Player"));
        assert!(out.contains(". with_init :: < Player > ()"));
        assert!(out.contains(". with_to_string :: < Player > ()"));
        assert!(out.contains(". with_on_notification :: < Player > ()"));
        assert!(out.contains("PluginItem :: Virtuals"));

        // None of them is dispatched by name.
        assert!(!out.contains("\"_init\""));
        assert!(!out.contains("\"_to_string\""));
    }

    #[test]
    fn other_methods_become_dispatch_arms() {
        let out = transform(quote! {
            impl INode for Player {
                fn ready(&mut self) {}
                fn process(&mut self, delta: f64) {}
            }
        })
        .expect("valid impl");

        assert!(out.contains("\"_ready\" =>"));
        assert!(out.contains("\"_process\" =>"));
        assert!(out.contains("< Player as INode > :: process"));
        assert!(out.contains("PtrcallType :: Virtual"));
        assert!(!out.contains("with_init"));
    }

    #[test]
    fn non_interface_trait_is_rejected() {
        assert!(transform(quote! {
            impl Clone for Player {
                fn clone(&self) -> Self { todo!() }
            }
        })
        .is_err());
    }
}
