/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::StringName;
use crate::classes::Object;
use crate::obj::Gd;

engine_class! {
    /// Base class of everything in the scene tree.
    ///
    /// Nodes are manually managed: a node is freed together with its parent, or explicitly with
    /// [`Gd::free()`] or [`queue_free()`][Self::queue_free].
    pub struct Node: Object;
    memory = MemManual, MemManual;
    init_level = Scene;
    instantiable;
}

engine_methods! {
    impl Node {
        /// Adds `node` as the last child. The child is then owned by this node.
        fn add_child(&mut self, node: &Gd<Node>) = 3863233950, defaults(false, 0);

        /// Removes `node` from the children. Ownership goes back to the caller, who must free it eventually.
        fn remove_child(&mut self, node: &Gd<Node>) = 1078189570;

        /// Child at `index`; negative indices count from the end.
        fn get_child(&self, index: i32) -> Option<Gd<Node>> = 541253412, defaults(false);

        fn get_child_count(&self) -> i32 = 894402480, defaults(false);
        fn get_parent(&self) -> Option<Gd<Node>> = 3160264692;
        fn get_name(&self) -> StringName = 2002593661;

        /// Frees the node at the end of the current frame. Safe to call on nodes that are still processing.
        fn queue_free(&mut self) = 3218959716;
    }
}

engine_interface! {
    /// Virtual methods of [`Node`], overridden with `#[godot_api] impl INode for MyNode`.
    pub trait INode {
        /// Called when the node and its children have entered the scene tree.
        fn ready(&mut self);

        /// Called every frame, with the elapsed time in seconds since the previous frame.
        fn process(&mut self, delta: f64);

        /// Called every physics tick.
        fn physics_process(&mut self, delta: f64);

        fn enter_tree(&mut self);
        fn exit_tree(&mut self);
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::ClassName;
    use crate::obj::{bounds, Bounds, GodotClass};

    struct Walker;

    impl GodotClass for Walker {
        type Base = Node;
        const INIT_LEVEL: crate::init::InitLevel = crate::init::InitLevel::Scene;

        fn class_name() -> ClassName {
            ClassName::from_static("Walker")
        }
    }

    unsafe impl Bounds for Walker {
        type Memory = <Node as Bounds>::Memory;
        type DynMemory = <Node as Bounds>::DynMemory;
        type Declarer = bounds::DeclUser;
    }

    impl crate::private::You_forgot_the_attribute__godot_api for Walker {}

    impl INode for Walker {}

    #[test]
    #[should_panic(expected = "process is not dispatched")]
    fn missing_override_is_never_called() {
        Walker.process(0.016);
    }

    #[test]
    #[should_panic(expected = "to_string is not dispatched")]
    fn missing_to_string_is_never_called() {
        let _ = INode::to_string(&Walker);
    }
}
