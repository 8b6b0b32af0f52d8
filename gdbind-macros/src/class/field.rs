/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::class::func::{make_method_registration, FuncDefinition, ReceiverType, SignatureInfo};
use crate::util::{bail, AttrArgs};
use crate::ParseResult;

/// A named field of a `#[derive(GodotClass)]` struct.
pub struct Field {
    pub name: Ident,
    pub ty: venial::TypeExpr,

    /// Expression from `#[init(val = ...)]`. The generated constructor falls back to `Default::default()`.
    pub init_val: Option<TokenStream>,

    /// Present if the field carries `#[var]`.
    pub var: Option<FieldVar>,
}

impl Field {
    pub fn new(field: &venial::NamedField) -> Self {
        Self {
            name: field.name.clone(),
            ty: field.ty.clone(),
            init_val: None,
            var: None,
        }
    }
}

pub struct Fields {
    /// Every field except the base field, in declaration order.
    pub regular: Vec<Field>,

    /// The `Base<T>` field: named `base`, or marked `#[base]`.
    pub base: Option<Field>,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// #[var]

/// One side of a property.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Accessor {
    /// `get_<field>` or `set_<field>`, generated next to the class.
    Generated,

    /// A `#[func]` the user wrote, referred to by its Rust name.
    Custom(Ident),

    /// Not accessible from this side, e.g. a read-only property has no setter.
    Absent,
}

/// Parsed `#[var]`, `#[var(get)]`, `#[var(get = f, set)]` and so on.
///
/// Without keys, both accessors are generated. Naming only one of `get`/`set` leaves the other one absent.
#[derive(Clone, Debug)]
pub struct FieldVar {
    pub getter: Accessor,
    pub setter: Accessor,
}

impl FieldVar {
    /// `None` if `attributes` has no `#[var]`.
    pub fn parse(attributes: &[venial::Attribute]) -> ParseResult<Option<Self>> {
        let Some(mut args) = AttrArgs::find(attributes, "var")? else {
            return Ok(None);
        };

        let getter = take_accessor(&mut args, "get")?;
        let setter = take_accessor(&mut args, "set")?;
        let span = args.span();
        args.done()?;

        let var = match (getter, setter) {
            (None, None) => Self {
                getter: Accessor::Generated,
                setter: Accessor::Generated,
            },
            (getter, setter) => Self {
                getter: getter.unwrap_or(Accessor::Absent),
                setter: setter.unwrap_or(Accessor::Absent),
            },
        };

        if var.getter == Accessor::Absent {
            return Err(venial::Error::new_at_span(
                span,
                "#[var] needs a getter; write `get` or `get = method` next to `set`",
            ));
        }
        Ok(Some(var))
    }
}

/// `key` alone means generated, `key = f` names a method.
fn take_accessor(args: &mut AttrArgs, key: &str) -> ParseResult<Option<Accessor>> {
    let accessor = args.get_flag_or_ident(key)?.map(|method| match method {
        Some(method) => Accessor::Custom(method),
        None => Accessor::Generated,
    });
    Ok(accessor)
}

/// Code inside `__register_exports()` for one `#[var]` field: generated accessors first, then the property.
pub fn make_property_registration(class_name: &Ident, field: &Field, var: &FieldVar) -> TokenStream {
    let field_name = &field.name;
    let field_ty = &field.ty;
    let property_name = field_name.to_string();

    let getter_name = accessor_name(&var.getter, "get", field_name);
    let setter_name = accessor_name(&var.setter, "set", field_name);

    let mut registrations = Vec::new();
    if var.getter == Accessor::Generated {
        registrations.push(make_method_registration(class_name, accessor_definition(field, "get")));
    }
    if var.setter == Accessor::Generated {
        registrations.push(make_method_registration(class_name, accessor_definition(field, "set")));
    }

    let prv = super::private_path();
    quote! {
        #( #registrations )*
        #prv::register_var::<#class_name, #field_ty>(#property_name, #getter_name, #setter_name);
    }
}

/// The `impl` block with the generated accessors of all `#[var]` fields.
pub fn make_accessor_impl(class_name: &Ident, fields: &[Field]) -> TokenStream {
    let mut accessors = Vec::new();

    for field in fields {
        let Some(var) = &field.var else {
            continue;
        };

        let name = &field.name;
        let via = via_type(&field.ty);

        if var.getter == Accessor::Generated {
            let getter = format_ident!("get_{name}");
            accessors.push(quote! {
                #[doc(hidden)]
                pub fn #getter(&self) -> #via {
                    ::gdbind::meta::ToGodot::to_godot(&self.#name)
                }
            });
        }
        if var.setter == Accessor::Generated {
            let setter = format_ident!("set_{name}");
            accessors.push(quote! {
                #[doc(hidden)]
                pub fn #setter(&mut self, #name: #via) {
                    self.#name = ::gdbind::meta::FromGodot::from_godot(#name);
                }
            });
        }
    }

    if accessors.is_empty() {
        return TokenStream::new();
    }

    quote! {
        impl #class_name {
            #( #accessors )*
        }
    }
}

fn accessor_name(accessor: &Accessor, prefix: &str, field_name: &Ident) -> String {
    match accessor {
        Accessor::Generated => format!("{prefix}_{field_name}"),
        Accessor::Custom(method) => method.to_string(),
        Accessor::Absent => String::new(),
    }
}

fn via_type(ty: &venial::TypeExpr) -> TokenStream {
    quote! { <#ty as ::gdbind::meta::GodotConvert>::Via }
}

/// Signature of a generated accessor, in the form `#[func]` registration expects.
fn accessor_definition(field: &Field, prefix: &str) -> FuncDefinition {
    let name = &field.name;
    let via = via_type(&field.ty);

    let signature_info = if prefix == "get" {
        SignatureInfo {
            method_name: format_ident!("get_{name}"),
            receiver_type: ReceiverType::Ref,
            param_idents: vec![],
            param_types: vec![],
            ret_type: via,
        }
    } else {
        SignatureInfo {
            method_name: format_ident!("set_{name}"),
            receiver_type: ReceiverType::Mut,
            param_idents: vec![name.clone()],
            param_types: vec![via],
            ret_type: quote! { () },
        }
    };

    FuncDefinition {
        signature_info,
        rename: None,
    }
}

/// Rejects `#[var]` where it has no meaning.
pub fn validate_var_on_base(field: &venial::NamedField) -> ParseResult<()> {
    match AttrArgs::find(&field.attributes, "var")? {
        Some(_) => bail("#[var] is not allowed on the base field", &field.name),
        None => Ok(()),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ident;

    fn field(tokens: TokenStream) -> venial::NamedField {
        let item = quote! { struct Holder { #tokens } };
        match venial::parse_item(item) {
            Ok(venial::Item::Struct(s)) => match s.fields {
                venial::Fields::Named(named) => named.fields.inner[0].0.clone(),
                other => panic!("expected named fields, got {other:?}"),
            },
            other => panic!("expected struct, got {other:?}"),
        }
    }

    fn var(tokens: TokenStream) -> ParseResult<Option<FieldVar>> {
        FieldVar::parse(&field(tokens).attributes)
    }

    #[test]
    fn plain_var_generates_both_accessors() {
        let v = var(quote! { #[var] speed: i64 }).expect("valid").expect("present");
        assert_eq!(v.getter, Accessor::Generated);
        assert_eq!(v.setter, Accessor::Generated);
    }

    #[test]
    fn getter_only_is_read_only() {
        let v = var(quote! { #[var(get)] speed: i64 }).expect("valid").expect("present");
        assert_eq!(v.getter, Accessor::Generated);
        assert_eq!(v.setter, Accessor::Absent);
    }

    #[test]
    fn custom_accessors() {
        let v = var(quote! { #[var(get = current_speed, set)] speed: i64 })
            .expect("valid")
            .expect("present");
        assert_eq!(v.getter, Accessor::Custom(ident("current_speed")));
        assert_eq!(v.setter, Accessor::Generated);
    }

    #[test]
    fn setter_without_getter_is_rejected() {
        assert!(var(quote! { #[var(set)] speed: i64 }).is_err());
    }

    #[test]
    fn unknown_var_key_is_rejected() {
        assert!(var(quote! { #[var(export)] speed: i64 }).is_err());
    }

    #[test]
    fn no_var_attribute() {
        assert!(var(quote! { speed: i64 }).expect("valid").is_none());
    }

    #[test]
    fn property_refers_to_accessor_names() {
        let mut f = Field::new(&field(quote! { speed: i64 }));
        let v = FieldVar {
            getter: Accessor::Custom(ident("current_speed")),
            setter: Accessor::Absent,
        };
        f.var = Some(v.clone());

        let out = make_property_registration(&ident("Car"), &f, &v).to_string();
        assert!(out.contains("register_var :: < Car , i64 > (\"speed\" , \"current_speed\" , \"\")"));

        // Nothing generated, so nothing else registered.
        assert!(!out.contains("ClassMethodInfo"));
        assert!(make_accessor_impl(&ident("Car"), &[f]).is_empty());
    }

    #[test]
    fn generated_accessors_are_registered() {
        let mut f = Field::new(&field(quote! { speed: i64 }));
        f.var = var(quote! { #[var] speed: i64 }).expect("valid");

        let Some(v) = &f.var else {
            panic!("var missing");
        };
        let registration = make_property_registration(&ident("Car"), &f, v).to_string();
        assert!(registration.contains("StringName :: from (\"get_speed\")"));
        assert!(registration.contains("StringName :: from (\"set_speed\")"));
        assert!(registration.contains("(\"speed\" , \"get_speed\" , \"set_speed\")"));

        let accessors = make_accessor_impl(&ident("Car"), &[f]).to_string();
        assert!(accessors.contains("pub fn get_speed (& self)"));
        assert!(accessors.contains("pub fn set_speed (& mut self , speed :"));
    }
}
