/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};

use crate::util::{bail, path_ends_with, retain_attributes_except, AttrArgs};
use crate::ParseResult;

pub fn attribute_itest(input_item: venial::Item) -> ParseResult<TokenStream> {
    let func = match input_item {
        venial::Item::Function(f) => f,
        _ => return bail("#[itest] can only be applied to functions", input_item),
    };

    let mut args = AttrArgs::require(&func.attributes, "itest", &func.name)?;
    let skipped = args.get_flag("skip")?;
    let focused = args.get_flag("focus")?;
    args.done()?;

    if func.generic_params.is_some()
        || func.params.len() > 1
        || func.return_ty.is_some()
        || func.where_clause.is_some()
    {
        return bad_signature(&func);
    }

    let mode = match (skipped, focused) {
        (true, true) => return bail("#[itest]: keys `skip` and `focus` are mutually exclusive", &func.name),
        (true, false) => quote! { Skip },
        (false, true) => quote! { Focus },
        (false, false) => quote! { Run },
    };

    let test_name = &func.name;
    let test_name_str = func.name.to_string();

    // Reuse the parameter name chosen by the user, or declare an unused one.
    let param = match func.params.first() {
        Some((venial::FnParam::Typed(param), _punct))
            if path_ends_with(&param.ty.tokens, "TestContext") =>
        {
            param.to_token_stream()
        }
        Some(_) => return bad_signature(&func),
        None => quote! { __unused_context: &crate::framework::TestContext },
    };

    let body = &func.body;

    // Keep attributes like #[allow] or #[expect].
    let other_attributes = retain_attributes_except(&func.attributes, "itest");

    Ok(quote! {
        #(#other_attributes)*
        pub fn #test_name(#param) {
            #body
        }

        ::gdbind::sys::plugin_add!(__GDBIND_ITEST_CASES in crate::framework; crate::framework::ItestCase {
            name: #test_name_str,
            module: std::module_path!(),
            line: std::line!(),
            mode: crate::framework::CaseMode::#mode,
            run: #test_name,
        });
    })
}

fn bad_signature(func: &venial::Function) -> ParseResult<TokenStream> {
    bail(
        format!(
            "#[itest] function must have one of these signatures:\
            \n  fn {f}() {{ ... }}\
            \n  fn {f}(ctx: &TestContext) {{ ... }}",
            f = func.name,
        ),
        &func.name,
    )
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{ident, venial_parse_meta};

    fn transform(meta: TokenStream, input: TokenStream) -> ParseResult<String> {
        let item = venial_parse_meta(&meta, ident("itest"), &input)?;
        attribute_itest(item).map(|ts| ts.to_string())
    }

    #[test]
    fn test_without_context() {
        let out = transform(TokenStream::new(), quote! { fn noise_is_seeded() {} }).expect("valid test");

        assert!(out.contains("__unused_context : & crate :: framework :: TestContext"));
        assert!(out.contains("name : \"noise_is_seeded\""));
        assert!(out.contains("mode : crate :: framework :: CaseMode :: Run"));
        assert!(out.contains("run : noise_is_seeded"));
    }

    #[test]
    fn test_with_context_and_skip() {
        let out = transform(
            quote! { skip },
            quote! { fn node_tree(ctx: &TestContext) {} },
        )
        .expect("valid test");

        assert!(out.contains("ctx : & TestContext"));
        assert!(out.contains("CaseMode :: Skip"));
    }

    #[test]
    fn skip_and_focus_are_exclusive() {
        assert!(transform(quote! { skip, focus }, quote! { fn t() {} }).is_err());
    }

    #[test]
    fn return_type_is_rejected() {
        assert!(transform(TokenStream::new(), quote! { fn t() -> bool { true } }).is_err());
    }

    #[test]
    fn wrong_parameter_is_rejected() {
        assert!(transform(TokenStream::new(), quote! { fn t(x: i32) {} }).is_err());
    }
}
