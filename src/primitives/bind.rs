//! Reactive binder - connect a prop to one node field.
//!
//! Literal props are written once. Accessor props (signal or getter) are
//! read inside an effect that writes the field on every change. The effect
//! belongs to the active scope and stops with it.
//!
//! The effect holds the node weakly: a binding never keeps a node alive, and
//! it skips writes once the node is destroyed.

use spark_signals::effect;

use super::types::Prop;
use crate::scene::SceneNode;

/// Bind `prop` to the field written by `apply`.
pub fn bind_prop<T, F>(node: &SceneNode, prop: Prop<T>, apply: F)
where
    T: Clone + PartialEq + 'static,
    F: Fn(&SceneNode, T) + 'static,
{
    match prop {
        Prop::Static(value) => apply(node, value),
        Prop::Signal(signal) => bind_accessor(node, move || signal.get(), apply),
        Prop::Getter(getter) => bind_accessor(node, move || getter(), apply),
    }
}

/// Track `read` in an effect and push each value into the node.
pub fn bind_accessor<T, R, F>(node: &SceneNode, read: R, apply: F)
where
    T: 'static,
    R: Fn() -> T + 'static,
    F: Fn(&SceneNode, T) + 'static,
{
    let target = node.downgrade();
    // Owned by the active scope.
    let _stop = effect(move || {
        // Read first so the dependency is tracked even for a dead node.
        let value = read();
        if let Some(node) = target.upgrade() {
            if !node.is_destroyed() {
                apply(&node, value);
            }
        }
    });
}

/// Bind an optional prop to a setter, skipping `None`.
///
/// ```ignore
/// bind_field!(node, props.x, SceneNode::set_x);
/// ```
macro_rules! bind_field {
    ($node:expr, $prop:expr, $apply:expr) => {
        if let Some(prop) = $prop {
            $crate::primitives::bind_prop(&$node, prop, $apply);
        }
    };
}

pub(crate) use bind_field;
