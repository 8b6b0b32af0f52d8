/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::class::field::{make_accessor_impl, make_property_registration, validate_var_on_base, Field, FieldVar, Fields};
use crate::util::{bail, ident, AttrArgs};
use crate::ParseResult;

pub fn derive_godot_class(item: venial::Item) -> ParseResult<TokenStream> {
    let venial::Item::Struct(class) = item else {
        return bail("#[derive(GodotClass)] is only allowed on structs", item);
    };
    if class.generic_params.is_some() {
        return bail(
            "#[derive(GodotClass)] does not support lifetimes or generic parameters",
            &class.generic_params,
        );
    }

    let attrs = ClassAttributes::parse(&class)?;
    let fields = parse_fields(&class)?;

    let class_name = &class.name;
    let registered_name = attrs.rename.as_ref().unwrap_or(class_name).to_string();
    let base_ty = &attrs.base_ty;
    let base_class = quote! { ::gdbind::classes::#base_ty };
    let prv = super::private_path();

    let mut item = quote! { #prv::ClassItem::new::<#class_name>() };
    let init_impl = match attrs.init {
        InitStrategy::Generated => {
            item = quote! { #item.with_generated_init::<#class_name>() };
            make_generated_init(class_name, &fields)
        }
        InitStrategy::UserDefined => {
            item = quote! { #item.with_user_init() };
            TokenStream::new()
        }
        InitStrategy::Absent => {
            item = quote! { #item.with_no_init::<#class_name>() };
            TokenStream::new()
        }
    };
    if attrs.is_tool {
        item = quote! { #item.with_tool() };
    }

    let with_base_impl = fields.base.as_ref().map(|Field { name, .. }| {
        quote! {
            impl ::gdbind::obj::WithBaseField for #class_name {
                fn base_field(&self) -> &::gdbind::obj::Base<<Self as ::gdbind::obj::GodotClass>::Base> {
                    &self.#name
                }
            }
        }
    });

    // Only the direct base and the root are known here; deeper ancestors are reached by upcasting the base.
    let inherits_object = (base_ty != "Object").then(|| {
        quote! {
            unsafe impl ::gdbind::obj::Inherits<::gdbind::classes::Object> for #class_name {}
        }
    });

    let accessor_impl = make_accessor_impl(class_name, &fields.regular);
    let property_registrations = fields
        .regular
        .iter()
        .filter_map(|field| Some(make_property_registration(class_name, field, field.var.as_ref()?)));

    Ok(quote! {
        impl ::gdbind::obj::GodotClass for #class_name {
            type Base = #base_class;
            const INIT_LEVEL: ::gdbind::init::InitLevel = <#base_class as ::gdbind::obj::GodotClass>::INIT_LEVEL;

            fn class_name() -> ::gdbind::meta::ClassName {
                ::gdbind::meta::ClassName::from_static(#registered_name)
            }
        }

        // SAFETY: the memory strategy is inherited from the engine base class.
        unsafe impl ::gdbind::obj::Bounds for #class_name {
            type Memory = <#base_class as ::gdbind::obj::Bounds>::Memory;
            type DynMemory = <#base_class as ::gdbind::obj::Bounds>::DynMemory;
            type Declarer = ::gdbind::obj::bounds::DeclUser;
        }

        // SAFETY: the engine object behind every instance is of class `#base_class`.
        unsafe impl ::gdbind::obj::Inherits<#base_class> for #class_name {}
        #inherits_object

        #init_impl
        #with_base_impl
        #accessor_impl

        impl ::gdbind::obj::cap::ImplementsGodotExports for #class_name {
            fn __register_exports() {
                #( #property_registrations )*
            }
        }

        ::gdbind::sys::plugin_add!(__GDBIND_PLUGIN_REGISTRY in #prv; #prv::ClassPlugin::new::<#class_name>(
            #prv::PluginItem::Class(#item)
        ));
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Implementation

#[derive(Debug)]
enum InitStrategy {
    /// `#[class(init)]`: constructor built from field initializers.
    Generated,

    /// No key: `init()` comes from the interface trait impl.
    UserDefined,

    /// `#[class(no_init)]`: the engine cannot instantiate the class.
    Absent,
}

struct ClassAttributes {
    base_ty: Ident,
    init: InitStrategy,
    is_tool: bool,
    rename: Option<Ident>,
}

impl ClassAttributes {
    fn parse(class: &venial::Struct) -> ParseResult<Self> {
        let mut attrs = Self {
            base_ty: ident("RefCounted"),
            init: InitStrategy::UserDefined,
            is_tool: false,
            rename: None,
        };

        let Some(mut args) = AttrArgs::find(&class.attributes, "class")? else {
            return Ok(attrs);
        };

        if let Some(base) = args.get_ident("base")? {
            attrs.base_ty = base;
        }
        attrs.init = match (args.get_flag("init")?, args.get_flag("no_init")?) {
            (true, true) => {
                return Err(venial::Error::new_at_span(
                    args.span(),
                    "#[class]: keys `init` and `no_init` are mutually exclusive",
                ))
            }
            (true, false) => InitStrategy::Generated,
            (false, true) => InitStrategy::Absent,
            (false, false) => InitStrategy::UserDefined,
        };
        attrs.is_tool = args.get_flag("tool")?;
        attrs.rename = args.get_ident("rename")?;
        args.done()?;

        Ok(attrs)
    }
}

fn parse_fields(class: &venial::Struct) -> ParseResult<Fields> {
    let named = match &class.fields {
        venial::Fields::Unit => vec![],
        venial::Fields::Tuple(_) => {
            return bail("#[derive(GodotClass)] is not supported for tuple structs", &class.name)
        }
        venial::Fields::Named(named) => named.fields.inner.iter().map(|(f, _)| f.clone()).collect(),
    };

    let mut fields = Fields {
        regular: Vec::new(),
        base: None,
    };

    for named_field in named {
        let mut field = Field::new(&named_field);

        let is_base = match AttrArgs::find(&named_field.attributes, "base")? {
            Some(args) => {
                args.done()?;
                true
            }
            None => named_field.name == "base",
        };

        if let Some(mut args) = AttrArgs::find(&named_field.attributes, "init")? {
            if is_base {
                return bail("#[init] is not allowed on the base field", &named_field.name);
            }
            let Some(val) = args.get_expr("val")? else {
                return Err(venial::Error::new_at_span(
                    args.span(),
                    "#[init] requires the key `val = expression`",
                ));
            };
            field.init_val = Some(val);
            args.done()?;
        }

        if is_base {
            validate_var_on_base(&named_field)?;
            if let Some(previous) = &fields.base {
                return bail(
                    format!("at most one base field allowed, already have `{}`", previous.name),
                    &named_field.name,
                );
            }
            fields.base = Some(field);
        } else {
            field.var = FieldVar::parse(&named_field.attributes)?;
            fields.regular.push(field);
        }
    }

    Ok(fields)
}

/// `GodotDefault` impl whose constructor assigns each field its `#[init(val)]` or `Default::default()`.
fn make_generated_init(class_name: &Ident, fields: &Fields) -> TokenStream {
    let (base_param, base_init) = match &fields.base {
        Some(Field { name, .. }) => (ident("base"), quote! { #name: base, }),
        None => (ident("_base"), TokenStream::new()),
    };

    let field_inits = fields.regular.iter().map(|Field { name, init_val, .. }| {
        let value = init_val
            .clone()
            .unwrap_or_else(|| quote! { ::std::default::Default::default() });
        quote! { #name: #value, }
    });

    quote! {
        impl ::gdbind::obj::cap::GodotDefault for #class_name {
            fn __godot_user_init(#base_param: ::gdbind::obj::Base<Self::Base>) -> Self {
                Self {
                    #( #field_inits )*
                    #base_init
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_struct(tokens: TokenStream) -> venial::Struct {
        match venial::parse_item(tokens) {
            Ok(venial::Item::Struct(s)) => s,
            other => panic!("expected struct, got {other:?}"),
        }
    }

    fn derive(tokens: TokenStream) -> ParseResult<String> {
        let item = venial::parse_item(tokens)?;
        derive_godot_class(item).map(|ts| ts.to_string())
    }

    #[test]
    fn base_field_by_name_or_attribute() {
        let fields = parse_fields(&parse_struct(quote! {
            struct Player {
                base: Base<Node>,
                health: i64,
            }
        }))
        .expect("fields");
        assert_eq!(fields.base.map(|f| f.name.to_string()), Some("base".into()));
        assert_eq!(fields.regular.len(), 1);

        let fields = parse_fields(&parse_struct(quote! {
            struct Player {
                #[base]
                owner: Base<Node>,
            }
        }))
        .expect("fields");
        assert_eq!(fields.base.map(|f| f.name.to_string()), Some("owner".into()));
        assert!(fields.regular.is_empty());
    }

    #[test]
    fn two_base_fields_are_rejected() {
        let class = parse_struct(quote! {
            struct Player {
                base: Base<Node>,
                #[base]
                other: Base<Node>,
            }
        });
        assert!(parse_fields(&class).is_err());
    }

    #[test]
    fn var_on_base_field_is_rejected() {
        let class = parse_struct(quote! {
            struct Player {
                #[var]
                base: Base<Node>,
            }
        });
        assert!(parse_fields(&class).is_err());
    }

    #[test]
    fn init_and_no_init_are_exclusive() {
        let class = parse_struct(quote! {
            #[class(init, no_init)]
            struct Player {}
        });
        assert!(ClassAttributes::parse(&class).is_err());
    }

    #[test]
    fn class_attributes() {
        let class = parse_struct(quote! {
            #[class(base = Sky, tool, rename = TerrainSky)]
            struct MySky {}
        });

        let attrs = ClassAttributes::parse(&class).expect("attributes");
        assert_eq!(attrs.base_ty, "Sky");
        assert!(attrs.is_tool);
        assert!(matches!(attrs.init, InitStrategy::UserDefined));
        assert_eq!(attrs.rename.map(|r| r.to_string()), Some("TerrainSky".into()));
    }

    #[test]
    fn generated_init_uses_field_defaults() {
        let class = parse_struct(quote! {
            #[class(init)]
            struct Counter {
                #[init(val = 10)]
                remaining: i64,
                label: String,
            }
        });

        let fields = parse_fields(&class).expect("fields");
        let init_impl = make_generated_init(&class.name, &fields).to_string();

        assert!(init_impl.contains("remaining : 10"));
        assert!(init_impl.contains("label : :: std :: default :: Default :: default ()"));
        assert!(init_impl.contains("_base"));
    }

    #[test]
    fn derive_emits_class_item_and_exports() {
        let out = derive(quote! {
            #[class(init, base = Node)]
            struct Car {
                base: Base<Node>,
                #[var]
                speed: i64,
                #[var(get)]
                wheels: i64,
                fuel: f64,
            }
        })
        .expect("valid class");

        assert!(out.contains("PluginItem :: Class (:: gdbind :: private :: ClassItem :: new :: < Car > () . with_generated_init :: < Car > ())"));
        assert!(out.contains("ImplementsGodotExports for Car"));
        assert!(out.contains("register_var :: < Car , i64 > (\"speed\" , \"get_speed\" , \"set_speed\")"));
        assert!(out.contains("register_var :: < Car , i64 > (\"wheels\" , \"get_wheels\" , \"\")"));
        assert!(!out.contains("set_wheels"));
        assert!(!out.contains("\"fuel\""));
    }

    #[test]
    fn class_without_vars_registers_no_property() {
        let out = derive(quote! {
            #[class(no_init)]
            struct Marker {}
        })
        .expect("valid class");

        assert!(out.contains("with_no_init :: < Marker > ()"));
        assert!(out.contains("fn __register_exports () { }"));
    }
}
