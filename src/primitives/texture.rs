//! Resource loader - asynchronous texture resolution for sprites.
//!
//! A request hides the sprite and drops its texture, then hands the source
//! to the configured loader and spawns the wait. Every request bumps the
//! sprite's request counter; a completion is applied only if it carries the
//! latest number and the node is still alive.
//!
//! Outcomes are reported on the node's emitter:
//! [`TEXTURE_LOAD_EVENT`] on success, [`TEXTURE_ERROR_EVENT`] on failure.

use spark_signals::untrack;

use super::bind::bind_prop;
use super::types::Prop;
use crate::error::LoadError;
use crate::scene::{SceneEvent, SceneNode, Texture, TextureSource, WeakSceneNode};
use crate::state::assets;

/// Emitted after a texture is assigned.
pub const TEXTURE_LOAD_EVENT: &str = "textureload";
/// Emitted after the latest load failed.
pub const TEXTURE_ERROR_EVENT: &str = "textureerror";

/// Bind a literal or reactive texture source to a sprite.
///
/// A reactive source starts a new request on every change.
pub fn bind_texture(node: &SceneNode, source: Prop<TextureSource>) {
    bind_prop(node, source, |node, source| {
        untrack(|| request_texture(node, source));
    });
}

/// Start loading `source` into `node`.
///
/// Returns the request number, or `None` if `node` is not a sprite.
/// A missing loader or spawner fails the request immediately.
pub fn request_texture(node: &SceneNode, source: TextureSource) -> Option<u64> {
    let request = node.begin_texture_request(&source)?;
    tracing::debug!(source = %source, request, "texture load started");

    let target = node.downgrade();
    let started = assets::load_texture(&source).and_then(|pending| {
        let target = target.clone();
        let source = source.clone();
        assets::spawn(async move {
            let result = pending.await;
            settle(&target, request, &source, result);
        })
    });

    if let Err(error) = started {
        settle(&target, request, &source, Err(error));
    }
    Some(request)
}

fn settle(
    target: &WeakSceneNode,
    request: u64,
    source: &TextureSource,
    result: Result<Texture, LoadError>,
) {
    let Some(node) = target.upgrade() else {
        tracing::debug!(source = %source, request, "texture load finished after node was dropped");
        return;
    };

    let failure = result.as_ref().err().cloned();
    if !node.finish_texture_request(request, result) {
        tracing::debug!(source = %source, request, "stale texture load ignored");
        return;
    }

    match failure {
        None => {
            tracing::debug!(source = %source, request, "texture loaded");
            node.emit(&SceneEvent::new(TEXTURE_LOAD_EVENT));
        }
        Some(error) => {
            tracing::warn!(source = %source, %error, "texture load failed");
            node.emit(&SceneEvent::new(TEXTURE_ERROR_EVENT));
        }
    }
}
