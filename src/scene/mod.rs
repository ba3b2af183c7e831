//! Scene graph - retained-mode 2D nodes.
//!
//! The minimal node model the element bindings drive:
//!
//! - [`SceneNode`] - container, graphics, sprite and text nodes
//! - [`EventEmitter`] - per-node named listeners
//! - [`GraphicsContext`] - recorded vector drawing commands
//! - [`Texture`] / [`TextureState`] - sprite bitmaps and their load lifecycle
//!
//! Geometry (transforms, bounds) is computed with `kurbo`. There is no
//! renderer here; a backend reads the tree.

mod emitter;
mod graphics;
mod node;
mod texture;

pub use emitter::{EventEmitter, Listener, ListenerId, SceneEvent};
pub use graphics::{DrawCommand, GraphicsContext, Paint, Primitive};
pub use node::{SceneNode, WeakSceneNode, DEFAULT_FONT_SIZE};
pub use texture::{Texture, TextureSource, TextureState};
