/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, Span, TokenStream, TokenTree};
use quote::ToTokens;

use super::{bail, error, path_is_single};
use crate::ParseResult;

/// Arguments of one attribute like `#[class(init, base = Node)]`.
///
/// Every `get_*` call consumes its key; [`AttrArgs::done`] reports the keys nobody asked for.
pub(crate) struct AttrArgs {
    attr: String,
    span: Span,
    entries: Vec<(Ident, Option<Vec<TokenTree>>)>,
}

impl AttrArgs {
    /// Looks for `#[name(...)]` among `attributes`. More than one occurrence is an error.
    pub fn find(attributes: &[venial::Attribute], name: &str) -> ParseResult<Option<Self>> {
        let mut matching = attributes
            .iter()
            .filter(|attr| path_is_single(&attr.path, name));

        let Some(attr) = matching.next() else {
            return Ok(None);
        };
        if let Some(extra) = matching.next() {
            return bail(format!("#[{name}] may only appear once"), extra);
        }

        let tokens = match &attr.value {
            venial::AttributeValue::Equals(eq, _) => {
                return bail(format!("#[{name}] takes `(key, key = value)` arguments"), eq)
            }
            value => value.get_value_tokens(),
        };

        Ok(Some(Self {
            attr: name.to_string(),
            span: attr.tk_brackets.span,
            entries: split_entries(name, tokens)?,
        }))
    }

    /// Like [`AttrArgs::find`], but a missing attribute is an error located at `context`.
    pub fn require(
        attributes: &[venial::Attribute],
        name: &str,
        context: impl ToTokens,
    ) -> ParseResult<Self> {
        match Self::find(attributes, name)? {
            Some(args) => Ok(args),
            None => bail(format!("missing attribute #[{name}]"), context),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    fn take(&mut self, key: &str) -> Option<(Ident, Option<Vec<TokenTree>>)> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos))
    }

    /// A key without value, like `tool`.
    pub fn get_flag(&mut self, key: &str) -> ParseResult<bool> {
        match self.take(key) {
            None => Ok(false),
            Some((_, None)) => Ok(true),
            Some((key, Some(_))) => bail(format!("`{key}` does not take a value"), key),
        }
    }

    /// A key with a single identifier, like `base = Node`.
    pub fn get_ident(&mut self, key: &str) -> ParseResult<Option<Ident>> {
        let Some(value) = self.get_value(key, "identifier")? else {
            return Ok(None);
        };
        match value.as_slice() {
            [TokenTree::Ident(ident)] => Ok(Some(ident.clone())),
            [first, ..] => bail(format!("`{key}` expects a single identifier"), first),
            [] => unreachable!("values are never empty"),
        }
    }

    /// A key that is either alone or set to an identifier, like `get` or `get = speed`.
    ///
    /// `None` if absent, `Some(None)` for the bare key.
    pub fn get_flag_or_ident(&mut self, key: &str) -> ParseResult<Option<Option<Ident>>> {
        match self.take(key) {
            None => Ok(None),
            Some((_, None)) => Ok(Some(None)),
            Some((key, Some(value))) => match value.as_slice() {
                [TokenTree::Ident(ident)] => Ok(Some(Some(ident.clone()))),
                _ => bail(format!("`{key}` expects a single identifier"), key),
            },
        }
    }

    /// A key with an arbitrary expression, like `val = Vector2::ZERO`.
    pub fn get_expr(&mut self, key: &str) -> ParseResult<Option<TokenStream>> {
        let value = self.get_value(key, "expression")?;
        Ok(value.map(|tokens| tokens.into_iter().collect()))
    }

    fn get_value(&mut self, key: &str, what: &str) -> ParseResult<Option<Vec<TokenTree>>> {
        match self.take(key) {
            None => Ok(None),
            Some((key, None)) => bail(format!("`{key}` must be followed by `= {what}`"), key),
            Some((_, Some(value))) => Ok(Some(value)),
        }
    }

    /// Fails for every key that was not consumed.
    pub fn done(self) -> ParseResult<()> {
        let attr = self.attr;
        let mut errors = self
            .entries
            .into_iter()
            .map(|(key, _)| error(format!("#[{attr}] does not know key `{key}`"), key));

        match errors.next() {
            None => Ok(()),
            Some(first) => Err(errors.fold(first, |mut acc, e| {
                acc.combine(e);
                acc
            })),
        }
    }
}

/// Splits `a, b = x + 1, c = (d, e)` at top-level commas. Commas inside groups belong to the group token.
fn split_entries(attr: &str, tokens: &[TokenTree]) -> ParseResult<Vec<(Ident, Option<Vec<TokenTree>>)>> {
    let mut entries: Vec<(Ident, Option<Vec<TokenTree>>)> = Vec::new();

    for chunk in tokens.split(|tt| is_punct(tt, ',')) {
        let (key, rest) = match chunk {
            [] => continue,
            [TokenTree::Ident(key), rest @ ..] => (key.clone(), rest),
            [other, ..] => return bail(format!("#[{attr}] expects `key` or `key = value`"), other),
        };

        let value = match rest {
            [] => None,
            [eq, value @ ..] if is_punct(eq, '=') => {
                if value.is_empty() {
                    return bail(format!("missing value after `{key} =`"), eq);
                }
                Some(value.to_vec())
            }
            [other, ..] => {
                return bail(
                    format!("unexpected token after `{key}`; a `,` inside a value needs parentheses"),
                    other,
                )
            }
        };

        if entries.iter().any(|(k, _)| *k == key) {
            return bail(format!("key `{key}` given twice"), key);
        }
        entries.push((key, value));
    }

    Ok(entries)
}

fn is_punct(tt: &TokenTree, c: char) -> bool {
    matches!(tt, TokenTree::Punct(p) if p.as_char() == c)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn args(attr: TokenStream, name: &str) -> ParseResult<Option<AttrArgs>> {
        let item = quote! {
            #attr
            struct Holder;
        };
        let attributes = match venial::parse_item(item) {
            Ok(venial::Item::Struct(s)) => s.attributes,
            other => panic!("expected struct, got {other:?}"),
        };
        AttrArgs::find(&attributes, name)
    }

    fn parsed(attr: TokenStream) -> AttrArgs {
        args(attr, "class")
            .expect("valid attribute")
            .expect("attribute present")
    }

    #[test]
    fn flags_idents_and_exprs() {
        let mut a = parsed(quote! { #[class(tool, base = Node, val = Vector2::new(1.0, -2.0),)] });

        assert!(a.get_flag("tool").expect("flag"));
        assert!(!a.get_flag("init").expect("absent flag"));
        assert_eq!(
            a.get_ident("base").expect("ident").map(|i| i.to_string()),
            Some("Node".to_string())
        );
        assert_eq!(
            a.get_expr("val").expect("expr").map(|e| e.to_string()),
            Some(quote! { Vector2::new(1.0, -2.0) }.to_string())
        );
        assert!(a.done().is_ok());
    }

    #[test]
    fn flag_or_ident() {
        let mut a = parsed(quote! { #[class(get, set = apply)] });

        assert_eq!(a.get_flag_or_ident("get").expect("bare"), Some(None));
        assert_eq!(
            a.get_flag_or_ident("set").expect("named").flatten().map(|i| i.to_string()),
            Some("apply".to_string())
        );
        assert_eq!(a.get_flag_or_ident("other").expect("absent"), None);
        assert!(parsed(quote! { #[class(get = 1 + 2)] }).get_flag_or_ident("get").is_err());
    }

    #[test]
    fn expression_with_operators() {
        let mut a = parsed(quote! { #[class(val = -3 * 4)] });
        let expr = a.get_expr("val").expect("expr").expect("present");
        assert_eq!(expr.to_string(), quote! { -3 * 4 }.to_string());
    }

    #[test]
    fn unknown_keys_fail_on_done() {
        let mut a = parsed(quote! { #[class(init, colour = red)] });
        assert!(a.get_flag("init").expect("flag"));
        assert!(a.done().is_err());
    }

    #[test]
    fn wrong_value_shapes() {
        assert!(parsed(quote! { #[class(tool = true)] }).get_flag("tool").is_err());
        assert!(parsed(quote! { #[class(base)] }).get_ident("base").is_err());
        assert!(parsed(quote! { #[class(base = a::B)] }).get_ident("base").is_err());
    }

    #[test]
    fn malformed_attributes() {
        assert!(args(quote! { #[class(init, init)] }, "class").is_err());
        assert!(args(quote! { #[class(base =)] }, "class").is_err());
        assert!(args(quote! { #[class(1 = 2)] }, "class").is_err());
        assert!(args(quote! { #[class(a b)] }, "class").is_err());
        assert!(args(quote! { #[class] #[class] }, "class").is_err());
    }

    #[test]
    fn absent_attribute() {
        assert!(args(quote! { #[derive(Debug)] }, "class")
            .expect("no error")
            .is_none());
    }
}
