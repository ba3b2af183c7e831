//! Core types for spark-canvas.
//!
//! Small value types shared by the scene graph, the element factory and the
//! debug overlay. Geometry comes from `kurbo`.

pub use kurbo::{Affine, Point, Rect, Vec2};

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create an opaque color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self::rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    /// Return the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
}

// =============================================================================
// Node Kind
// =============================================================================

/// The four kinds of scene node an intrinsic element can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Grouping node with no content of its own.
    Container,
    /// Vector drawing node.
    Graphics,
    /// Bitmap node displaying a texture.
    Sprite,
    /// Text node.
    Text,
}

// =============================================================================
// Event Mode
// =============================================================================

/// How a node takes part in hit testing.
///
/// Only `Static` and `Dynamic` nodes are hit-testable targets. `Passive` is the
/// default: the node itself is skipped but its children may still be hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventMode {
    /// Neither the node nor its children receive events.
    None,
    /// Not hit-testable itself; children are.
    #[default]
    Passive,
    /// Hit-testable only when a parent is interactive.
    Auto,
    /// Hit-testable, no per-frame move events.
    Static,
    /// Hit-testable, receives synthetic move events every tick.
    Dynamic,
}

impl EventMode {
    /// Whether a node in this mode can be the target of a pointer event.
    #[inline]
    pub const fn is_interactive(self) -> bool {
        matches!(self, EventMode::Static | EventMode::Dynamic)
    }

    /// The canonical lowercase name of the mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventMode::None => "none",
            EventMode::Passive => "passive",
            EventMode::Auto => "auto",
            EventMode::Static => "static",
            EventMode::Dynamic => "dynamic",
        }
    }
}

// =============================================================================
// Node Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        const NONE = 0;
        /// Set once by `destroy()`, never cleared.
        const DESTROYED = 1 << 0;
        /// Reserved marker for the debug overlay's own subtree.
        const DEBUG_OVERLAY = 1 << 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_hex() {
        assert_eq!(Rgba::hex(0xff8000), Rgba::rgb(255, 128, 0));
        assert_eq!(Rgba::hex(0x00ff00), Rgba::GREEN);
        assert_eq!(Rgba::RED.with_alpha(10).a, 10);
    }

    #[test]
    fn test_event_mode_interactivity() {
        assert!(!EventMode::default().is_interactive());
        assert!(EventMode::Static.is_interactive());
        assert!(EventMode::Dynamic.is_interactive());
        assert!(!EventMode::Auto.is_interactive());
        assert_eq!(EventMode::Static.as_str(), "static");
    }

    #[test]
    fn test_node_flags() {
        let mut flags = NodeFlags::default();
        assert!(flags.is_empty());
        flags.insert(NodeFlags::DESTROYED);
        assert!(flags.contains(NodeFlags::DESTROYED));
        assert!(!flags.contains(NodeFlags::DEBUG_OVERLAY));
    }
}
