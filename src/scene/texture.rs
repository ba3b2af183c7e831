//! Textures and per-sprite load state.

use std::fmt;

use crate::error::LoadError;

/// A texture reference key (path, URL or asset alias).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureSource(String);

impl TextureSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextureSource {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for TextureSource {
    fn from(source: String) -> Self {
        Self(source)
    }
}

/// A resolved bitmap.
///
/// Only the metadata the scene graph needs; pixel storage belongs to the
/// renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    source: TextureSource,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn new(source: impl Into<TextureSource>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Where a sprite's texture is in its load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextureState {
    /// No texture was ever requested.
    #[default]
    Empty,
    /// A load for this source is in flight.
    Loading(TextureSource),
    /// The latest request resolved; the texture is assigned.
    Loaded,
    /// The latest request failed.
    Failed(LoadError),
}

impl TextureState {
    pub fn is_loading(&self) -> bool {
        matches!(self, TextureState::Loading(_))
    }
}
