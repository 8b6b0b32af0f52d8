/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::TokenStream;
use quote::quote;

use crate::util::{bail, ident, validate_impl, AttrArgs};
use crate::ParseResult;

pub fn attribute_gdextension(item: venial::Item) -> ParseResult<TokenStream> {
    let mut impl_decl = match item {
        venial::Item::Impl(item) => item,
        _ => return bail("#[gdextension] can only be applied to trait impls", item),
    };

    validate_impl(&impl_decl, Some("ExtensionLibrary"), "gdextension")?;
    if impl_decl.tk_unsafe.is_none() {
        return bail(
            "`impl ExtensionLibrary` must be marked unsafe, to confirm your opt-in to the safety model of the binding",
            impl_decl.tk_impl,
        );
    }

    let drained_attributes = std::mem::take(&mut impl_decl.attributes);
    let mut args = AttrArgs::require(&drained_attributes, "gdextension", &impl_decl)?;
    let entry_symbol = args.get_ident("entry_symbol")?;
    args.done()?;

    let entry_symbol = entry_symbol.unwrap_or_else(|| ident("gdext_rust_init"));
    let impl_ty = &impl_decl.self_ty;

    Ok(quote! {
        #impl_decl

        #[no_mangle]
        unsafe extern "C" fn #entry_symbol(
            get_proc_address: ::gdbind::sys::GDExtensionInterfaceGetProcAddress,
            library: ::gdbind::sys::GDExtensionClassLibraryPtr,
            init: *mut ::gdbind::sys::GDExtensionInitialization,
        ) -> ::gdbind::sys::GDExtensionBool {
            // SAFETY: pointers are forwarded unchanged from the engine.
            unsafe {
                ::gdbind::init::__gdext_load_library::<#impl_ty>(
                    get_proc_address,
                    library,
                    init,
                )
            }
        }

        fn __static_type_check() {
            // Ensures that the entry symbol matches the signature advertised in the FFI header.
            let _unused: ::gdbind::sys::GDExtensionInitializationFunction = Some(#entry_symbol);
        }
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::venial_parse_meta;

    fn transform(meta: TokenStream, input: TokenStream) -> ParseResult<String> {
        let item = venial_parse_meta(&meta, ident("gdextension"), &input)?;
        attribute_gdextension(item).map(|ts| ts.to_string())
    }

    #[test]
    fn default_entry_symbol() {
        let out = transform(
            TokenStream::new(),
            quote! { unsafe impl ExtensionLibrary for MyExtension {} },
        )
        .expect("valid impl");

        assert!(out.contains("fn gdext_rust_init"));
        assert!(out.contains("__gdext_load_library :: < MyExtension >"));
        assert!(!out.contains("# [gdextension"));
    }

    #[test]
    fn custom_entry_symbol() {
        let out = transform(
            quote! { entry_symbol = terrain_init },
            quote! { unsafe impl ExtensionLibrary for Terrain {} },
        )
        .expect("valid impl");

        assert!(out.contains("fn terrain_init"));
        assert!(!out.contains("gdext_rust_init"));
    }

    #[test]
    fn safe_impl_is_rejected() {
        assert!(transform(
            TokenStream::new(),
            quote! { impl ExtensionLibrary for MyExtension {} },
        )
        .is_err());
    }

    #[test]
    fn other_trait_is_rejected() {
        assert!(transform(
            TokenStream::new(),
            quote! { unsafe impl Send for MyExtension {} },
        )
        .is_err());
    }
}
