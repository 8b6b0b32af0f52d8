/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Table of GDExtension interface functions.
//!
//! The extension entry point is passed a `get_proc_address` function pointer, which is used to load all other
//! GDExtension FFI functions by name. Only the functions used by gdbind are part of the table.

use crate as sys;

/// Declares [`GDExtensionInterface`] from a list of `field: BindgenType` pairs.
///
/// The field name is the C name of the interface function, as understood by `get_proc_address`.
macro_rules! interface_table {
    ( $( $(#[$attr:meta])* $name:ident: $Ty:ident, )* ) => {
        /// Function pointers provided by the engine, loaded once during initialization.
        ///
        /// All entries are guaranteed to be non-null after [`GDExtensionInterface::load()`] succeeded.
        #[derive(Copy, Clone)]
        pub struct GDExtensionInterface {
            $(
                $(#[$attr])*
                pub $name: sys::$Ty,
            )*
        }

        impl GDExtensionInterface {
            /// Loads all interface functions through `get_proc_address`.
            ///
            /// Returns the C name of the first function that the engine does not provide.
            ///
            /// # Safety
            /// `get_proc_address` must be the function pointer passed by Godot to the entry point.
            pub(crate) unsafe fn load(
                get_proc_address: sys::GDExtensionInterfaceGetProcAddress,
            ) -> Result<Self, &'static str> {
                let get_proc_address = get_proc_address.ok_or("get_proc_address")?;

                Ok(Self {
                    $(
                        $name: {
                            let c_name = concat!(stringify!($name), "\0");
                            let fptr = get_proc_address(sys::c_str(c_name.as_bytes()));
                            if fptr.is_none() {
                                return Err(stringify!($name));
                            }

                            // SAFETY: both are `Option<unsafe extern "C" fn(...)>`, only the signature differs.
                            std::mem::transmute::<sys::GDExtensionInterfaceFunctionPtr, sys::$Ty>(fptr)
                        },
                    )*
                })
            }
        }
    };
}

interface_table! {
    get_godot_version: GDExtensionInterfaceGetGodotVersion,
    mem_alloc: GDExtensionInterfaceMemAlloc,
    mem_free: GDExtensionInterfaceMemFree,

    print_error: GDExtensionInterfacePrintError,
    print_warning: GDExtensionInterfacePrintWarning,
    print_script_error: GDExtensionInterfacePrintScriptError,

    variant_new_copy: GDExtensionInterfaceVariantNewCopy,
    variant_new_nil: GDExtensionInterfaceVariantNewNil,
    variant_destroy: GDExtensionInterfaceVariantDestroy,
    variant_get_type: GDExtensionInterfaceVariantGetType,
    variant_stringify: GDExtensionInterfaceVariantStringify,
    variant_booleanize: GDExtensionInterfaceVariantBooleanize,
    get_variant_from_type_constructor: GDExtensionInterfaceGetVariantFromTypeConstructor,
    get_variant_to_type_constructor: GDExtensionInterfaceGetVariantToTypeConstructor,
    variant_get_ptr_constructor: GDExtensionInterfaceVariantGetPtrConstructor,
    variant_get_ptr_destructor: GDExtensionInterfaceVariantGetPtrDestructor,
    variant_get_ptr_builtin_method: GDExtensionInterfaceVariantGetPtrBuiltinMethod,
    variant_get_ptr_utility_function: GDExtensionInterfaceVariantGetPtrUtilityFunction,

    string_new_with_utf8_chars_and_len: GDExtensionInterfaceStringNewWithUtf8CharsAndLen,
    string_to_utf8_chars: GDExtensionInterfaceStringToUtf8Chars,
    string_name_new_with_utf8_chars_and_len: GDExtensionInterfaceStringNameNewWithUtf8CharsAndLen,

    array_operator_index: GDExtensionInterfaceArrayOperatorIndex,
    array_operator_index_const: GDExtensionInterfaceArrayOperatorIndexConst,

    object_method_bind_call: GDExtensionInterfaceObjectMethodBindCall,
    object_method_bind_ptrcall: GDExtensionInterfaceObjectMethodBindPtrcall,
    object_destroy: GDExtensionInterfaceObjectDestroy,
    global_get_singleton: GDExtensionInterfaceGlobalGetSingleton,
    object_get_instance_binding: GDExtensionInterfaceObjectGetInstanceBinding,
    object_set_instance_binding: GDExtensionInterfaceObjectSetInstanceBinding,
    object_set_instance: GDExtensionInterfaceObjectSetInstance,
    object_get_class_name: GDExtensionInterfaceObjectGetClassName,
    object_cast_to: GDExtensionInterfaceObjectCastTo,
    object_get_instance_from_id: GDExtensionInterfaceObjectGetInstanceFromId,
    object_get_instance_id: GDExtensionInterfaceObjectGetInstanceId,

    ref_get_object: GDExtensionInterfaceRefGetObject,
    ref_set_object: GDExtensionInterfaceRefSetObject,

    classdb_construct_object: GDExtensionInterfaceClassdbConstructObject,
    classdb_get_method_bind: GDExtensionInterfaceClassdbGetMethodBind,
    classdb_get_class_tag: GDExtensionInterfaceClassdbGetClassTag,
    classdb_register_extension_class2: GDExtensionInterfaceClassdbRegisterExtensionClass2,
    classdb_register_extension_class_method: GDExtensionInterfaceClassdbRegisterExtensionClassMethod,
    classdb_register_extension_class_property: GDExtensionInterfaceClassdbRegisterExtensionClassProperty,
    classdb_unregister_extension_class: GDExtensionInterfaceClassdbUnregisterExtensionClass,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Version checks

/// Queries the version of the running engine.
///
/// # Safety
/// `get_proc_address` must be the function pointer passed by Godot to the entry point.
pub unsafe fn runtime_version(
    get_proc_address: sys::GDExtensionInterfaceGetProcAddress,
) -> sys::GDExtensionGodotVersion {
    let get_proc_address = get_proc_address.expect("get_proc_address unexpectedly null");
    let get_godot_version = get_proc_address(sys::c_str(b"get_godot_version\0"));

    // SAFETY: `GDExtensionInterfaceGetGodotVersion` is an `Option` of an `unsafe extern "C"` function pointer.
    let get_godot_version = sys::cast_fn_ptr!(get_godot_version as sys::GDExtensionInterfaceGetGodotVersion);

    let mut version = std::mem::MaybeUninit::<sys::GDExtensionGodotVersion>::zeroed();
    get_godot_version(version.as_mut_ptr());

    version.assume_init()
}

/// Panics if the running engine is older than the API version gdbind was compiled against.
///
/// # Safety
/// `get_proc_address` must be the function pointer passed by Godot to the entry point.
pub(crate) unsafe fn ensure_runtime_compatibility(
    get_proc_address: sys::GDExtensionInterfaceGetProcAddress,
) {
    let runtime = runtime_version(get_proc_address);
    let runtime_triple = (
        runtime.major as u8,
        runtime.minor as u8,
        runtime.patch as u8,
    );

    if !is_runtime_compatible(runtime_triple, sys::GODOT_API_VERSION) {
        let runtime_str = sys::read_version_string(&runtime);
        let static_str = sys::GODOT_API_VERSION_STRING;

        panic!(
            "gdbind was compiled against newer Godot version: {static_str}\n\
            but loaded by older Godot binary, with version: {runtime_str}\n\
            \n\
            Update your Godot engine version, or compile gdbind with an older `api-*` feature.\n"
        );
    }
}

/// Lexicographical comparison; patch versions are compatible in both directions within the same minor.
pub(crate) fn is_runtime_compatible(runtime: (u8, u8, u8), compiled: (u8, u8, u8)) -> bool {
    (runtime.0, runtime.1) >= (compiled.0, compiled.1)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::is_runtime_compatible;

    #[test]
    fn runtime_compatibility() {
        assert!(is_runtime_compatible((4, 3, 0), (4, 3, 0)));
        assert!(is_runtime_compatible((4, 5, 1), (4, 3, 0)));
        assert!(is_runtime_compatible((4, 3, 0), (4, 3, 2)));
        assert!(!is_runtime_compatible((4, 2, 2), (4, 3, 0)));
        assert!(!is_runtime_compatible((3, 6, 0), (4, 2, 0)));
    }
}
