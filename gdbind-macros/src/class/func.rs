/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Trampolines for `#[func]` methods and overridden engine callbacks.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::util::{bail, map_self_to_class_name};
use crate::ParseResult;

/// A Rust method to register with ClassDB.
pub struct FuncDefinition {
    pub signature_info: SignatureInfo,

    /// From `#[func(rename = ...)]`.
    pub rename: Option<String>,
}

impl FuncDefinition {
    fn registered_name(&self) -> String {
        self.rename
            .clone()
            .unwrap_or_else(|| self.signature_info.method_name.to_string())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ReceiverType {
    Ref,
    Mut,
    Static,
}

/// Signature of a method with `Self` already replaced by the class name.
#[derive(Debug)]
pub struct SignatureInfo {
    pub method_name: Ident,
    pub receiver_type: ReceiverType,
    pub param_idents: Vec<Ident>,
    pub param_types: Vec<TokenStream>,
    pub ret_type: TokenStream,
}

impl SignatureInfo {
    /// `type CallParams = (...); type CallRet = ...;`, the frame types both trampolines decode.
    fn frame_types(&self) -> TokenStream {
        let param_types = &self.param_types;
        let ret_type = &self.ret_type;

        quote! {
            type CallParams = ( #(#param_types,)* );
            type CallRet = #ret_type;
        }
    }
}

/// Block evaluating to the `GDExtensionClassCallVirtual` for one overridden engine callback.
///
/// The call goes through `<Class as Trait>`, so an inherent method of the same name is never picked.
pub fn make_virtual_callback(
    class_name: &Ident,
    trait_path: &TokenStream,
    signature_info: &SignatureInfo,
    godot_name: &str,
) -> TokenStream {
    let method_name = &signature_info.method_name;
    let frame_types = signature_info.frame_types();
    let invoke = make_invocation(class_name, signature_info, &quote! { <#class_name as #trait_path>::#method_name });
    let call_ctx = make_call_context(class_name, godot_name);

    quote! {
        {
            use ::gdbind::sys;
            #frame_types

            unsafe extern "C" fn virtual_fn(
                instance_ptr: sys::GDExtensionClassInstancePtr,
                args_ptr: *const sys::GDExtensionConstTypePtr,
                ret: sys::GDExtensionTypePtr,
            ) {
                let call_ctx = #call_ctx;
                ::gdbind::private::handle_ptrcall_panic(&call_ctx, || unsafe {
                    ::gdbind::meta::Signature::<CallParams, CallRet>::in_ptrcall(
                        instance_ptr, &call_ctx, args_ptr, ret, #invoke, sys::PtrcallType::Virtual,
                    )
                });
            }

            Some(virtual_fn)
        }
    }
}

/// Block that registers one method with ClassDB, with a varcall and a ptrcall entry point.
pub fn make_method_registration(class_name: &Ident, func: FuncDefinition) -> TokenStream {
    let registered_name = func.registered_name();
    let signature_info = &func.signature_info;
    let method_name = &signature_info.method_name;

    let frame_types = signature_info.frame_types();
    let flags = make_method_flags(signature_info.receiver_type);
    let invoke = make_invocation(class_name, signature_info, &quote! { #class_name::#method_name });
    let call_ctx = make_call_context(class_name, &registered_name);
    let param_names = signature_info.param_idents.iter().map(Ident::to_string);

    quote! {
        {
            use ::gdbind::sys;
            #frame_types

            unsafe extern "C" fn varcall_fn(
                _method_data: *mut std::ffi::c_void,
                instance_ptr: sys::GDExtensionClassInstancePtr,
                args_ptr: *const sys::GDExtensionConstVariantPtr,
                arg_count: sys::GDExtensionInt,
                ret: sys::GDExtensionVariantPtr,
                err: *mut sys::GDExtensionCallError,
            ) {
                let call_ctx = #call_ctx;
                // SAFETY: the engine passes a writable error struct.
                let out_err = unsafe { &mut *err };

                ::gdbind::private::handle_varcall_panic(&call_ctx, out_err, || unsafe {
                    ::gdbind::meta::Signature::<CallParams, CallRet>::in_varcall(
                        instance_ptr, &call_ctx, args_ptr, arg_count, ret, err, #invoke,
                    )
                });
            }

            unsafe extern "C" fn ptrcall_fn(
                _method_data: *mut std::ffi::c_void,
                instance_ptr: sys::GDExtensionClassInstancePtr,
                args_ptr: *const sys::GDExtensionConstTypePtr,
                ret: sys::GDExtensionTypePtr,
            ) {
                let call_ctx = #call_ctx;
                ::gdbind::private::handle_ptrcall_panic(&call_ctx, || unsafe {
                    ::gdbind::meta::Signature::<CallParams, CallRet>::in_ptrcall(
                        instance_ptr, &call_ctx, args_ptr, ret, #invoke, sys::PtrcallType::Standard,
                    )
                });
            }

            // SAFETY: both entry points decode `CallParams` and produce `CallRet`; static functions never read the
            // instance pointer.
            let method_info = unsafe {
                ::gdbind::private::ClassMethodInfo::from_signature::<#class_name, CallParams, CallRet>(
                    ::gdbind::builtin::StringName::from(#registered_name),
                    Some(varcall_fn),
                    Some(ptrcall_fn),
                    #flags,
                    &[ #( #param_names ),* ],
                    Vec::new(),
                )
            };
            method_info.register_extension_class_method();
        };
    }
}

/// Parses the signature of a method that is going to be registered.
pub fn into_signature_info(signature: &venial::Function, class_name: &Ident) -> ParseResult<SignatureInfo> {
    if signature.generic_params.is_some() {
        return bail(
            "registered functions do not support lifetimes or generic parameters",
            &signature.name,
        );
    }

    let mut receiver_type = ReceiverType::Static;
    let mut param_idents = Vec::new();
    let mut param_types = Vec::new();
    let mut unnamed = 0;

    for (param, _) in signature.params.inner.iter() {
        match param {
            venial::FnParam::Receiver(recv) if recv.tk_ref.is_none() => {
                return bail(
                    "registered functions take `&self`, `&mut self` or no receiver",
                    &signature.name,
                );
            }
            venial::FnParam::Receiver(recv) => {
                receiver_type = match recv.tk_mut {
                    Some(_) => ReceiverType::Mut,
                    None => ReceiverType::Ref,
                };
            }
            venial::FnParam::Typed(typed) => {
                param_idents.push(param_ident(&typed.name, &mut unnamed));
                param_types.push(map_self_to_class_name(typed.ty.tokens.clone(), class_name));
            }
        }
    }

    let ret_type = signature
        .return_ty
        .as_ref()
        .map_or_else(|| quote! { () }, |ty| map_self_to_class_name(ty.tokens.clone(), class_name));

    Ok(SignatureInfo {
        method_name: signature.name.clone(),
        receiver_type,
        param_idents,
        param_types,
        ret_type,
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Implementation

fn make_call_context(class_name: &Ident, godot_name: &str) -> TokenStream {
    let class_name_str = class_name.to_string();
    quote! { ::gdbind::meta::CallContext::func(#class_name_str, #godot_name) }
}

/// Closure `|instance_ptr, params| ...` that binds the instance as the receiver demands and calls `target`.
fn make_invocation(class_name: &Ident, signature_info: &SignatureInfo, target: &TokenStream) -> TokenStream {
    let params = &signature_info.param_idents;
    let storage = quote! { unsafe { ::gdbind::private::as_storage::<#class_name>(instance_ptr) } };

    let (instance_param, bind, receiver) = match signature_info.receiver_type {
        ReceiverType::Ref => (
            quote! { instance_ptr },
            quote! { let instance = #storage.get(); },
            quote! { &*instance, },
        ),
        ReceiverType::Mut => (
            quote! { instance_ptr },
            quote! { let mut instance = #storage.get_mut(); },
            quote! { &mut *instance, },
        ),
        ReceiverType::Static => (quote! { _instance_ptr }, TokenStream::new(), TokenStream::new()),
    };

    quote! {
        |#instance_param, params| {
            let ( #(#params,)* ) = params;
            #bind
            #target(#receiver #(#params),*)
        }
    }
}

/// Arguments are forwarded by name: `_` gets a synthetic one, and a leading underscore is not part of the
/// registered name.
fn param_ident(name: &Ident, unnamed: &mut u32) -> Ident {
    let name_str = name.to_string();

    if name_str == "_" {
        *unnamed += 1;
        return format_ident!("__unnamed_{}", *unnamed - 1);
    }
    match name_str.strip_prefix('_') {
        Some(stripped) => format_ident!("{stripped}"),
        None => name.clone(),
    }
}

fn make_method_flags(receiver_type: ReceiverType) -> TokenStream {
    let flags = quote! { ::gdbind::private::MethodFlags };

    match receiver_type {
        ReceiverType::Ref => quote! { #flags::NORMAL | #flags::CONST },
        ReceiverType::Mut => quote! { #flags::NORMAL },
        ReceiverType::Static => quote! { #flags::NORMAL | #flags::STATIC },
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ident;

    fn signature(tokens: TokenStream) -> ParseResult<SignatureInfo> {
        match venial::parse_item(tokens) {
            Ok(venial::Item::Function(f)) => into_signature_info(&f, &ident("Player")),
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn receivers_and_params() {
        let info = signature(quote! {
            fn add_child(&mut self, node: Gd<Node>, _force: bool, _: i64) -> Option<Gd<Self>> {}
        })
        .expect("signature");

        assert_eq!(info.receiver_type, ReceiverType::Mut);
        assert_eq!(
            info.param_idents.iter().map(Ident::to_string).collect::<Vec<_>>(),
            ["node", "force", "__unnamed_0"]
        );
        assert_eq!(info.ret_type.to_string(), quote! { Option<Gd<Player>> }.to_string());
    }

    #[test]
    fn static_function_without_return() {
        let info = signature(quote! { fn create(seed: i64) {} }).expect("signature");

        assert_eq!(info.receiver_type, ReceiverType::Static);
        assert_eq!(info.ret_type.to_string(), "()");
        assert_eq!(
            make_method_flags(info.receiver_type).to_string(),
            quote! { ::gdbind::private::MethodFlags::NORMAL | ::gdbind::private::MethodFlags::STATIC }.to_string()
        );
    }

    #[test]
    fn static_invocation_ignores_instance() {
        let info = signature(quote! { fn create(seed: i64) {} }).expect("signature");
        let invoke = make_invocation(&ident("Player"), &info, &quote! { Player::create }).to_string();

        assert!(invoke.starts_with("| _instance_ptr , params |"));
        assert!(!invoke.contains("as_storage"));
    }

    #[test]
    fn renamed_registration() {
        let info = signature(quote! { fn alive(&self) -> bool {} }).expect("signature");
        let def = FuncDefinition {
            signature_info: info,
            rename: Some("is_alive".to_string()),
        };

        let out = make_method_registration(&ident("Player"), def).to_string();
        assert!(out.contains("CallContext :: func (\"Player\" , \"is_alive\")"));
        assert!(out.contains("Player :: alive (& * instance ,"));
    }

    #[test]
    fn by_value_self_is_rejected() {
        assert!(signature(quote! { fn consume(self) {} }).is_err());
    }

    #[test]
    fn generic_function_is_rejected() {
        assert!(signature(quote! { fn pick<T>(&self, value: T) {} }).is_err());
    }
}
