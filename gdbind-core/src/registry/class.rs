/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{BTreeSet, HashMap};
use std::ptr;

use sys::{interface_fn, out, Global, InitLevel};

use crate::meta::ClassName;
use crate::registry::plugin::{ClassItem, ClassPlugin, Constructor, PluginItem, RegisterFn, VirtualsItem};
use crate::{godot_error, sys};

/// Classes registered per level, in registration order. Unregistration walks them backwards.
static LOADED_CLASSES: Global<HashMap<InitLevel, Vec<ClassName>>> = Global::default();

/// All plugin items of one class, merged.
#[derive(Debug)]
struct ClassEntry {
    name: ClassName,
    class: Option<ClassItem>,
    methods: Option<RegisterFn>,
    virtuals: Option<VirtualsItem>,
}

impl ClassEntry {
    fn new(name: ClassName) -> Self {
        Self {
            name,
            class: None,
            methods: None,
            virtuals: None,
        }
    }

    /// # Panics
    /// If the same kind of item arrives twice, which means two Rust types share one class name.
    fn merge(&mut self, item: PluginItem) {
        let kind = item.kind();
        let duplicate = match item {
            PluginItem::Class(c) => self.class.replace(c).is_some(),
            PluginItem::Methods(m) => self.methods.replace(m.register_methods).is_some(),
            PluginItem::Virtuals(v) => self.virtuals.replace(v).is_some(),
        };

        assert!(
            !duplicate,
            "class `{}` has more than one {kind}; two Rust types probably share the name, \
            use #[class(rename = ...)] on one of them",
            self.name
        );
    }

    fn parent(&self) -> Option<ClassName> {
        self.class.as_ref().map(|c| c.base_class_name)
    }

    fn constructor(&self) -> Option<Constructor> {
        let from_class = self.class.as_ref().and_then(|c| c.constructor);
        let from_virtuals = self.virtuals.as_ref().and_then(|v| v.constructor);

        if from_class.is_some() && from_virtuals.is_some() {
            panic!("class `{}` has both #[class(init)] and a user-defined init()", self.name);
        }
        from_class.or(from_virtuals)
    }

    /// Engine creation info. `None` if only `#[godot_api]` blocks exist without the derive.
    fn creation_info(&self) -> Option<sys::GDExtensionClassCreationInfo2> {
        let class = self.class.as_ref()?;
        let constructor = self.constructor();

        // SAFETY: only invoked after global library initialization.
        let hot_reload = unsafe { sys::config() }.hot_reload;

        let mut info = empty_creation_info();
        info.is_abstract = sys::bool_to_sys(!class.is_instantiable);
        info.free_instance_func = Some(class.free_fn);
        info.reference_func = Some(class.reference_fn);
        info.unreference_func = Some(class.unreference_fn);
        info.create_instance_func = constructor.map(|c| c.create);
        info.recreate_instance_func = constructor.filter(|_| hot_reload).map(|c| c.recreate);

        if let Some(virtuals) = &self.virtuals {
            info.to_string_func = virtuals.to_string_fn;
            info.notification_func = virtuals.notification_fn;

            // Non-tool classes keep their callbacks silent inside the editor.
            if !crate::private::is_class_inactive(class.is_tool) {
                info.get_virtual_func = Some(virtuals.get_virtual_fn);
            }
        }

        Some(info)
    }
}

/// Registers every self-registered class of `init_level` with the engine, parents before children.
pub fn register_classes(init_level: InitLevel) {
    out!("Register classes at level `{init_level:?}`...");

    let mut entries = HashMap::<ClassName, ClassEntry>::new();
    crate::private::iterate_plugins(|plugin: &ClassPlugin| {
        if plugin.init_level == init_level {
            entries
                .entry(plugin.class_name)
                .or_insert_with(|| ClassEntry::new(plugin.class_name))
                .merge(plugin.item.clone());
        }
    });

    let ordered = parents_first(entries);
    let mut loaded = LOADED_CLASSES.lock();
    let loaded_here = loaded.entry(init_level).or_default();

    for entry in ordered {
        if register_one(&entry) {
            loaded_here.push(entry.name);
        }
    }

    out!("Classes at level `{init_level:?}` registered.");
}

/// Unregisters the classes of `init_level`, children before parents.
pub fn unregister_classes(init_level: InitLevel) {
    let classes = LOADED_CLASSES.lock().remove(&init_level).unwrap_or_default();

    out!("Unregister classes at level `{init_level:?}`...");
    for class_name in classes.into_iter().rev() {
        out!("Unregister class: {class_name}");

        // SAFETY: the class was registered by this library at the same level.
        unsafe {
            interface_fn!(classdb_unregister_extension_class)(
                sys::get_library(),
                class_name.string_sys(),
            )
        };
    }
}

/// Names of the classes registered at `init_level`, in registration order.
pub fn registered_classes(init_level: InitLevel) -> Vec<ClassName> {
    LOADED_CLASSES
        .lock()
        .get(&init_level)
        .cloned()
        .unwrap_or_default()
}

/// Returns whether the class was registered. Failures are logged, not panicked on: a panic here would poison
/// [`LOADED_CLASSES`].
fn register_one(entry: &ClassEntry) -> bool {
    let name = entry.name;
    let (Some(parent), Some(info)) = (entry.parent(), entry.creation_info()) else {
        godot_error!("class `{name}` has #[godot_api] blocks, but no #[derive(GodotClass)]");
        return false;
    };

    out!("Register class:   {name} (inherits {parent})");

    // SAFETY: names are cached for the library's lifetime; the engine copies `info`.
    let tag = unsafe {
        interface_fn!(classdb_register_extension_class2)(
            sys::get_library(),
            name.string_sys(),
            parent.string_sys(),
            ptr::addr_of!(info),
        );

        // The call above only reports failures to the console.
        interface_fn!(classdb_get_class_tag)(name.string_sys())
    };

    if tag.is_null() {
        godot_error!("engine rejected class `{name}`; see the messages above");
        return false;
    }

    // Accessors must exist before properties refer to them.
    if let Some(RegisterFn(register_methods)) = entry.methods {
        register_methods();
    }
    if let Some(class) = &entry.class {
        (class.register_properties.0)();
    }

    true
}

/// Orders classes so that a parent defined in the same batch comes first. Ties are broken by name.
fn parents_first(mut entries: HashMap<ClassName, ClassEntry>) -> Vec<ClassEntry> {
    let mut ordered = Vec::with_capacity(entries.len());

    while !entries.is_empty() {
        let ready: BTreeSet<ClassName> = entries
            .values()
            .filter(|e| e.parent().map_or(true, |p| !entries.contains_key(&p)))
            .map(|e| e.name)
            .collect();

        // Rust cannot declare an inheritance cycle; take everything instead of spinning.
        let batch: Vec<ClassName> = if ready.is_empty() {
            let mut all: Vec<_> = entries.keys().copied().collect();
            all.sort();
            all
        } else {
            ready.into_iter().collect()
        };

        ordered.extend(batch.iter().filter_map(|name| entries.remove(name)));
    }

    ordered
}

fn empty_creation_info() -> sys::GDExtensionClassCreationInfo2 {
    sys::GDExtensionClassCreationInfo2 {
        is_virtual: sys::bool_to_sys(false),
        is_abstract: sys::bool_to_sys(false),
        is_exposed: sys::bool_to_sys(true),
        set_func: None,
        get_func: None,
        get_property_list_func: None,
        free_property_list_func: None,
        property_can_revert_func: None,
        property_get_revert_func: None,
        validate_property_func: None,
        notification_func: None,
        to_string_func: None,
        reference_func: None,
        unreference_func: None,
        create_instance_func: None,
        free_instance_func: None,
        recreate_instance_func: None,
        get_virtual_func: None,
        get_virtual_call_data_func: None,
        call_virtual_with_data_func: None,
        get_rid_func: None,
        class_userdata: ptr::null_mut(),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::plugin::MethodsItem;

    fn entry(name: &'static str, parent: &'static str) -> ClassEntry {
        let mut e = ClassEntry::new(ClassName::from_static(name));
        e.class = Some(fake_class_item(parent));
        e
    }

    fn fake_class_item(parent: &'static str) -> ClassItem {
        unsafe extern "C" fn free(_: *mut std::ffi::c_void, _: sys::GDExtensionClassInstancePtr) {}
        unsafe extern "C" fn refcount(_: sys::GDExtensionClassInstancePtr) {}

        ClassItem {
            base_class_name: ClassName::from_static(parent),
            constructor: None,
            free_fn: free,
            reference_fn: refcount,
            unreference_fn: refcount,
            register_properties: RegisterFn(|| {}),
            is_tool: false,
            is_instantiable: true,
        }
    }

    #[test]
    fn parents_are_registered_first() {
        let entries = [
            entry("TerrainSky", "BaseSky"),
            entry("BaseSky", "Sky"),
            entry("Player", "Node"),
        ]
        .into_iter()
        .map(|e| (e.name, e))
        .collect();

        let names: Vec<&str> = parents_first(entries).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["BaseSky", "Player", "TerrainSky"]);
    }

    #[test]
    fn orphan_methods_have_no_parent() {
        let mut e = ClassEntry::new(ClassName::from_static("Player"));
        e.merge(PluginItem::Methods(MethodsItem {
            register_methods: RegisterFn(|| {}),
        }));

        assert!(e.parent().is_none());
        assert!(e.constructor().is_none());
    }

    #[test]
    #[should_panic(expected = "more than one #[godot_api] impl")]
    fn duplicate_inherent_impl() {
        let mut e = ClassEntry::new(ClassName::from_static("Player"));
        let item = PluginItem::Methods(MethodsItem {
            register_methods: RegisterFn(|| {}),
        });

        e.merge(item.clone());
        e.merge(item);
    }
}
