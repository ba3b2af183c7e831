//! Error types.
//!
//! Construction errors are returned synchronously from the element factory.
//! Texture load failures never escape a background task: they are stored on
//! the sprite as [`TextureState::Failed`](crate::scene::TextureState::Failed).

use thiserror::Error;

/// Errors returned by [`create_scene_node`](crate::create_scene_node).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    /// The tag does not name one of the intrinsic elements.
    #[error("unknown intrinsic element `{0}`")]
    UnknownIntrinsic(String),

    /// A child entry could not be attached.
    #[error("invalid child: {0}")]
    Child(#[from] SceneError),
}

/// Errors from scene-graph topology operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("cannot attach children to a destroyed node")]
    DestroyedParent,

    #[error("cannot attach a destroyed node")]
    DestroyedChild,

    #[error("attaching a node to itself or its descendant would create a cycle")]
    Cycle,
}

/// Errors produced while resolving a texture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("texture `{0}` not found")]
    NotFound(String),

    #[error("failed to decode texture `{path}`: {reason}")]
    Decode { path: String, reason: String },

    #[error("no texture loader configured")]
    NoLoader,

    #[error("failed to spawn texture load: {0}")]
    Spawn(String),
}
