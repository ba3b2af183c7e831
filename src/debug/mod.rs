//! Debug tooling.
//!
//! - [`overlay`] - bounding boxes and labels over a live subtree

pub mod overlay;

pub use overlay::{create_overlay, create_overlay_with_style, DebugOverlay, OverlayStyle};
