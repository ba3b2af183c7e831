//! Pipeline - attaching built subtrees to a host scene.
//!
//! ```text
//! builder ──run in root Scope──▶ SceneNode ──add_child──▶ host parent
//!                                    │
//!                      MountHandle ──┘ (unmount / drop disposes the scope)
//! ```

pub mod mount;

pub use mount::{mount, unmount, MountHandle};
