//! Mount API - attach a built subtree and own its lifetime.
//!
//! `mount` runs a builder inside a fresh root scope, attaches the node it
//! returns under a host parent, and hands back a [`MountHandle`]. Unmounting
//! (or dropping the handle) disposes the scope: bindings stop, listeners go,
//! and the subtree is destroyed and detached from the parent.
//!
//! # Example
//!
//! ```
//! use spark_canvas::{create_scene_node, mount, NodeProps, SceneNode};
//!
//! let stage = SceneNode::container();
//! let handle = mount(&stage, || create_scene_node("sprite", NodeProps::new().x(10.0)))?;
//! assert_eq!(stage.child_count(), 1);
//!
//! handle.unmount();
//! assert_eq!(stage.child_count(), 0);
//! # Ok::<(), spark_canvas::ElementError>(())
//! ```

use crate::engine::Scope;
use crate::error::ElementError;
use crate::scene::SceneNode;

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`]. Dropping it unmounts.
pub struct MountHandle {
    scope: Scope,
    root: SceneNode,
}

impl MountHandle {
    /// The node the builder returned.
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// The scope that owns everything the builder registered.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn is_mounted(&self) -> bool {
        !self.scope.is_disposed()
    }

    /// Dispose the scope and destroy the subtree.
    pub fn unmount(self) {
        self.scope.dispose();
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Build a subtree inside a new root scope and attach it to `parent`.
///
/// On error nothing stays behind: the scope is disposed before returning.
pub fn mount<F>(parent: &SceneNode, build: F) -> Result<MountHandle, ElementError>
where
    F: FnOnce() -> Result<SceneNode, ElementError>,
{
    let scope = Scope::new();

    let root = match scope.run(build) {
        Ok(root) => root,
        Err(err) => {
            scope.dispose();
            return Err(err);
        }
    };

    if let Err(err) = parent.add_child(&root) {
        scope.dispose();
        return Err(err.into());
    }

    tracing::debug!(children = root.child_count(), "mounted");
    Ok(MountHandle { scope, root })
}

/// Unmount a handle. Same as [`MountHandle::unmount`].
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}
