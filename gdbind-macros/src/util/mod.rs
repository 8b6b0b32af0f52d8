/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Group, Ident, TokenStream, TokenTree};
use quote::{format_ident, quote, ToTokens};

use crate::ParseResult;

mod attr_args;

pub(crate) use attr_args::AttrArgs;

pub fn ident(s: &str) -> Ident {
    format_ident!("{}", s)
}

pub fn bail<R>(msg: impl AsRef<str>, tokens: impl ToTokens) -> ParseResult<R> {
    Err(error(msg, tokens))
}

pub fn error(msg: impl AsRef<str>, tokens: impl ToTokens) -> venial::Error {
    venial::Error::new_at_tokens(tokens, msg.as_ref())
}

/// Parses `#[self_name(meta)] input` as one item, so that attribute macros see their own arguments like any attribute.
pub(crate) fn venial_parse_meta(
    meta: &TokenStream,
    self_name: Ident,
    input: &TokenStream,
) -> ParseResult<venial::Item> {
    let input = quote! {
        #[#self_name(#meta)]
        #input
    };

    venial::parse_item(input)
}

pub(crate) fn path_is_single(path: &[TokenTree], expected: &str) -> bool {
    path.len() == 1 && path[0].to_string() == expected
}

pub(crate) fn path_ends_with(path: &[TokenTree], expected: &str) -> bool {
    path.last()
        .map(|last| last.to_string() == expected)
        .unwrap_or(false)
}

/// Returns all attributes except the ones named `name`.
pub(crate) fn retain_attributes_except<'a>(
    attributes: &'a [venial::Attribute],
    name: &'a str,
) -> impl Iterator<Item = &'a venial::Attribute> {
    attributes
        .iter()
        .filter(move |attr| !path_is_single(&attr.path, name))
}

/// Gets the right-most type name in the path.
pub(crate) fn extract_typename(ty: &venial::TypeExpr) -> Option<venial::PathSegment> {
    match ty.as_path() {
        Some(mut path) => path.segments.pop(),
        _ => None,
    }
}

/// Replaces every `Self` in `tokens` with `class_name`; `Self` is unavailable inside the nested `extern "C"` functions.
pub(crate) fn map_self_to_class_name<In, Out>(tokens: In, class_name: &Ident) -> Out
where
    In: IntoIterator<Item = TokenTree>,
    Out: FromIterator<TokenTree>,
{
    tokens
        .into_iter()
        .map(|tt| match tt {
            TokenTree::Ident(ident) if ident == "Self" => TokenTree::Ident(class_name.clone()),
            TokenTree::Group(group) => TokenTree::Group(Group::new(
                group.delimiter(),
                map_self_to_class_name(group.stream(), class_name),
            )),
            tt => tt,
        })
        .collect()
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Validation for trait/impl

/// Validates that the declaration is `impl SomeType` and returns `SomeType`.
pub(crate) fn validate_impl(
    original_impl: &venial::Impl,
    expected_trait: Option<&str>,
    attr: &str,
) -> ParseResult<Ident> {
    if let Some(expected_trait) = expected_trait {
        let is_expected = original_impl
            .trait_ty
            .as_ref()
            .and_then(extract_typename)
            .is_some_and(|seg| seg.ident == expected_trait);

        if !is_expected {
            return bail(
                format!("#[{attr}] for trait impls requires trait to be `{expected_trait}`"),
                original_impl,
            );
        }
    }

    validate_self(original_impl, attr)
}

/// Validates that the declaration is `impl ISomething for SomeType`, returning `SomeType` and the trait path.
pub(crate) fn validate_trait_impl_virtual(
    original_impl: &venial::Impl,
    attr: &str,
) -> ParseResult<(Ident, venial::TypeExpr)> {
    let Some(trait_ty) = original_impl.trait_ty.as_ref() else {
        return bail(format!("#[{attr}] expects a trait impl"), original_impl);
    };

    let is_interface = extract_typename(trait_ty).is_some_and(|seg| {
        let name = seg.ident.to_string();
        name.len() > 1 && name.starts_with('I') && name[1..].starts_with(char::is_uppercase)
    });

    if !is_interface {
        return bail(
            format!("#[{attr}] for trait impls requires an interface trait like `INode` or `IResource`"),
            original_impl,
        );
    }

    let class_name = validate_self(original_impl, attr)?;
    Ok((class_name, trait_ty.clone()))
}

fn validate_self(original_impl: &venial::Impl, attr: &str) -> ParseResult<Ident> {
    if original_impl.impl_generic_params.is_some() {
        return bail(
            format!("#[{attr}] does not support generic impl blocks"),
            original_impl,
        );
    }

    match extract_typename(&original_impl.self_ty) {
        Some(segment) if segment.generic_args.is_none() => Ok(segment.ident),
        Some(_) => bail(
            format!("#[{attr}] does currently not support generic arguments"),
            original_impl,
        ),
        None => bail(
            format!("#[{attr}] requires Self type to be a simple path"),
            original_impl,
        ),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_impl(tokens: TokenStream) -> venial::Impl {
        match venial::parse_item(tokens) {
            Ok(venial::Item::Impl(impl_decl)) => impl_decl,
            other => panic!("expected impl, got {other:?}"),
        }
    }

    #[test]
    fn self_is_replaced_in_nested_groups() {
        let tokens = quote! { Option<Gd<Self>> };
        let mapped: TokenStream = map_self_to_class_name(tokens, &ident("Player"));

        assert_eq!(mapped.to_string(), quote! { Option<Gd<Player>> }.to_string());
    }

    #[test]
    fn interface_impl_is_accepted() {
        let impl_decl = parse_impl(quote! {
            impl INode for Player {
                fn ready(&mut self) {}
            }
        });

        let (class_name, trait_ty) =
            validate_trait_impl_virtual(&impl_decl, "godot_api").expect("valid interface impl");

        assert_eq!(class_name, "Player");
        assert_eq!(
            extract_typename(&trait_ty).map(|seg| seg.ident.to_string()),
            Some("INode".to_string())
        );
    }

    #[test]
    fn non_interface_trait_is_rejected() {
        let impl_decl = parse_impl(quote! {
            impl Iterator for Player {}
        });

        assert!(validate_trait_impl_virtual(&impl_decl, "godot_api").is_err());
    }

    #[test]
    fn generic_self_is_rejected() {
        let impl_decl = parse_impl(quote! {
            impl Holder<i32> {}
        });

        assert!(validate_impl(&impl_decl, None, "godot_api").is_err());
    }

    #[test]
    fn path_helpers() {
        let path: Vec<TokenTree> = quote! { crate::framework::TestContext }.into_iter().collect();

        assert!(path_ends_with(&path, "TestContext"));
        assert!(!path_is_single(&path, "TestContext"));
        assert!(path_is_single(&[TokenTree::Ident(ident("func"))], "func"));
    }
}
