//! # spark-canvas
//!
//! Reactive element bindings for a retained-mode 2D scene graph.
//!
//! An element description (intrinsic tag + props + children) becomes a live
//! scene node whose fields follow reactive state, and which is torn down
//! when its owning scope is disposed.
//!
//! ## Architecture
//!
//! ```text
//! NodeProps ─▶ create_scene_node ─┬─ literal props ───────▶ SceneNode fields
//!                                 ├─ accessor props ──effect─▶ SceneNode fields
//!                                 ├─ handlers ────────────▶ node emitter
//!                                 ├─ draw ────────effect─▶ GraphicsContext
//!                                 ├─ texture ──loader/spawn─▶ sprite texture
//!                                 └─ cleanups + node ─────▶ active Scope
//! ```
//!
//! Reactivity comes from `spark_signals`: props take its `Signal`s or
//! getters that read them, and every scope is one of its effect scopes.
//!
//! Everything is single-threaded (`Rc`, `RefCell`, `thread_local!`).
//! Texture loads are the only asynchronous work; they run on a `futures`
//! local executor supplied by the host.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, EventMode, NodeFlags, kurbo geometry)
//! - [`scene`] - Scene nodes, emitter, graphics context, textures
//! - [`engine`] - Intrinsic tag registry, reactive scopes
//! - [`primitives`] - Element factory and its binders
//! - [`state`] - Texture loader / spawner configuration
//! - [`pipeline`] - Mounting built subtrees
//! - [`debug`] - Debug overlay

pub mod debug;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod scene;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{ElementError, LoadError, SceneError};

pub use engine::{
    adopt_node, create_root, is_intrinsic, on_cleanup, Cleanup, Intrinsic, KindProp, Scope,
};

pub use scene::{
    EventEmitter, GraphicsContext, ListenerId, SceneEvent, SceneNode, Texture, TextureSource,
    TextureState, WeakSceneNode,
};

pub use primitives::{
    create_intrinsic, create_scene_node, Child, DrawCallback, EventHandlers, NodeProps, Prop,
    RefCallback, TEXTURE_ERROR_EVENT, TEXTURE_LOAD_EVENT,
};

pub use pipeline::{mount, unmount, MountHandle};

pub use debug::{create_overlay, create_overlay_with_style, DebugOverlay, OverlayStyle};

pub use state::{reset_assets, set_spawner, set_texture_loader, set_texture_loader_fn, TextureLoader};
