/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Constructors, destructors and variant converters of the builtin types used by gdbind.

use crate as sys;
use crate::{Inner, VariantType};

pub type VariantFromTypeFn = <sys::GDExtensionVariantFromTypeConstructorFunc as Inner>::FnPtr;
pub type VariantToTypeFn = <sys::GDExtensionTypeFromVariantConstructorFunc as Inner>::FnPtr;
pub type PtrConstructorFn = <sys::GDExtensionPtrConstructor as Inner>::FnPtr;
pub type PtrDestructorFn = <sys::GDExtensionPtrDestructor as Inner>::FnPtr;

/// Lifecycle functions of one opaque builtin type (`String`, `StringName`, `Array`).
#[derive(Copy, Clone)]
pub struct OpaqueLifecycle {
    /// Constructor index 0 in the engine: no arguments.
    pub construct_default: PtrConstructorFn,

    /// Constructor index 1 in the engine: copy from a value of the same type.
    pub construct_copy: PtrConstructorFn,

    pub destroy: PtrDestructorFn,
}

/// Table of builtin lifecycle functions, loaded once when the binding is initialized.
pub struct BuiltinLifecycleTable {
    /// Indexed by variant type ordinal. `None` for `NIL` (which has no converters).
    variant_from_type: [Option<VariantFromTypeFn>; VariantType::MAX],
    variant_to_type: [Option<VariantToTypeFn>; VariantType::MAX],

    pub string: OpaqueLifecycle,
    pub string_name: OpaqueLifecycle,
    pub array: OpaqueLifecycle,

    /// `String(StringName)`, constructor index 2 of `String`.
    pub string_from_string_name: PtrConstructorFn,

    /// `StringName(String)`, constructor index 2 of `StringName`.
    pub string_name_from_string: PtrConstructorFn,
}

impl BuiltinLifecycleTable {
    /// # Safety
    /// `interface` must have been loaded from a running engine.
    pub(crate) unsafe fn load(interface: &sys::GDExtensionInterface) -> Self {
        let get_from = interface
            .get_variant_from_type_constructor
            .unwrap_unchecked();
        let get_to = interface.get_variant_to_type_constructor.unwrap_unchecked();

        let mut variant_from_type = [None; VariantType::MAX];
        let mut variant_to_type = [None; VariantType::MAX];

        for ty in VariantType::all_concrete() {
            let Some(index) = ty.table_index() else {
                continue;
            };

            variant_from_type[index] = Some(validate(get_from(ty.sys()), "variant_from_type", ty));
            variant_to_type[index] = Some(validate(get_to(ty.sys()), "variant_to_type", ty));
        }

        Self {
            variant_from_type,
            variant_to_type,
            string: load_opaque_lifecycle(interface, VariantType::STRING),
            string_name: load_opaque_lifecycle(interface, VariantType::STRING_NAME),
            array: load_opaque_lifecycle(interface, VariantType::ARRAY),
            string_from_string_name: load_constructor(interface, VariantType::STRING, 2),
            string_name_from_string: load_constructor(interface, VariantType::STRING_NAME, 2),
        }
    }

    /// Converter from a value of type `ty` to a new variant.
    ///
    /// # Panics
    /// If `ty` is `NIL` or outside of the known range.
    pub fn variant_from_type(&self, ty: VariantType) -> VariantFromTypeFn {
        ty.table_index()
            .and_then(|i| self.variant_from_type[i])
            .unwrap_or_else(|| panic!("no variant converter for type {ty:?}"))
    }

    /// Converter from a variant to a value of type `ty`.
    ///
    /// # Panics
    /// If `ty` is `NIL` or outside of the known range.
    pub fn variant_to_type(&self, ty: VariantType) -> VariantToTypeFn {
        ty.table_index()
            .and_then(|i| self.variant_to_type[i])
            .unwrap_or_else(|| panic!("no variant converter for type {ty:?}"))
    }
}

unsafe fn load_opaque_lifecycle(
    interface: &sys::GDExtensionInterface,
    ty: VariantType,
) -> OpaqueLifecycle {
    let get_constructor = interface.variant_get_ptr_constructor.unwrap_unchecked();
    let get_destructor = interface.variant_get_ptr_destructor.unwrap_unchecked();

    OpaqueLifecycle {
        construct_default: validate(get_constructor(ty.sys(), 0), "construct_default", ty),
        construct_copy: validate(get_constructor(ty.sys(), 1), "construct_copy", ty),
        destroy: validate(get_destructor(ty.sys()), "destroy", ty),
    }
}

unsafe fn load_constructor(
    interface: &sys::GDExtensionInterface,
    ty: VariantType,
    index: i32,
) -> PtrConstructorFn {
    let get_constructor = interface.variant_get_ptr_constructor.unwrap_unchecked();
    validate(get_constructor(ty.sys(), index), "constructor", ty)
}

fn validate<T>(function: Option<T>, what: &str, ty: VariantType) -> T {
    function.unwrap_or_else(|| {
        panic!(
            "Failed to load builtin lifecycle function {what} for {ty:?}.\n\
            Make sure gdbind and Godot are compatible."
        )
    })
}
