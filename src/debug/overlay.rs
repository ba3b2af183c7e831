//! Debug overlay - bounding boxes and labels for a live subtree.
//!
//! The overlay is an ordinary container flagged
//! [`NodeFlags::DEBUG_OVERLAY`]. Each `update()` throws away the previous
//! diagnostics and redraws one stroked box per descendant of the inspected
//! root (plus a text label when the descendant has one). Flagged subtrees
//! are never inspected and never count toward bounds, so the overlay may
//! live inside the tree it inspects.
//!
//! Overlay nodes are plain scene nodes: they are not created through the
//! element factory and belong to no scope.

use kurbo::Rect;

use crate::scene::{SceneNode, WeakSceneNode};
use crate::types::{NodeFlags, Point, Rgba};

/// Overlay appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub box_color: Rgba,
    pub stroke_width: f64,
    pub label_color: Rgba,
    pub label_font_size: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            box_color: Rgba::MAGENTA,
            stroke_width: 1.0,
            label_color: Rgba::WHITE,
            label_font_size: 10.0,
        }
    }
}

/// A diagnostic overlay bound to one inspected root.
pub struct DebugOverlay {
    root: WeakSceneNode,
    overlay: SceneNode,
    style: OverlayStyle,
}

/// Create an overlay for `root` with the default style.
///
/// The overlay starts empty and detached; add [`DebugOverlay::overlay`]
/// wherever it should be drawn, then call [`DebugOverlay::update`].
pub fn create_overlay(root: &SceneNode) -> DebugOverlay {
    create_overlay_with_style(root, OverlayStyle::default())
}

pub fn create_overlay_with_style(root: &SceneNode, style: OverlayStyle) -> DebugOverlay {
    let overlay = SceneNode::container();
    overlay.insert_flags(NodeFlags::DEBUG_OVERLAY);
    overlay.set_label(Some("debug-overlay".to_string()));

    DebugOverlay {
        root: root.downgrade(),
        overlay,
        style,
    }
}

impl DebugOverlay {
    /// The overlay container.
    pub fn overlay(&self) -> &SceneNode {
        &self.overlay
    }

    pub fn style(&self) -> OverlayStyle {
        self.style
    }

    /// Redraw diagnostics for the current state of the inspected tree.
    ///
    /// Returns the number of diagnostic nodes drawn (boxes plus labels).
    /// A no-op returning 0 once the overlay is destroyed or the root is gone.
    pub fn update(&self) -> usize {
        if self.overlay.is_destroyed() {
            return 0;
        }

        for stale in self.overlay.remove_children() {
            stale.destroy();
        }

        let Some(root) = self.root.upgrade() else {
            return 0;
        };

        // Diagnostics are positioned in the overlay's own space.
        let to_overlay = self.overlay.world_transform().inverse();

        let mut drawn = 0;
        for target in descendants(&root) {
            let Some(bounds) = target.bounds() else {
                continue;
            };
            let local = to_overlay.transform_rect_bbox(bounds);

            self.add_diagnostic(self.bounding_box(local));
            drawn += 1;

            if let Some(label) = target.label().filter(|label| !label.is_empty()) {
                self.add_diagnostic(self.label_text(label, local.origin()));
                drawn += 1;
            }
        }

        tracing::trace!(drawn, "debug overlay updated");
        drawn
    }

    /// Destroy the overlay and its diagnostics. Idempotent.
    pub fn destroy(&self) {
        self.overlay.destroy();
    }

    fn add_diagnostic(&self, node: SceneNode) {
        // Only fails if the overlay was destroyed, which update() ruled out.
        if self.overlay.add_child(&node).is_err() {
            node.destroy();
        }
    }

    fn bounding_box(&self, rect: Rect) -> SceneNode {
        let node = SceneNode::graphics();
        node.with_graphics(|g| {
            g.rect(rect).stroke(self.style.box_color, self.style.stroke_width);
        });
        node
    }

    fn label_text(&self, label: String, at: Point) -> SceneNode {
        let node = SceneNode::text(label);
        node.set_position(at);
        node.set_font_size(self.style.label_font_size);
        node.set_tint(self.style.label_color);
        node
    }
}

/// Every descendant of `root` in depth-first pre-order, skipping overlay
/// subtrees. `root` itself is not included.
fn descendants(root: &SceneNode) -> Vec<SceneNode> {
    let mut out = Vec::new();
    let mut stack: Vec<SceneNode> = root.children().into_iter().rev().collect();

    while let Some(node) = stack.pop() {
        if node.has_flag(NodeFlags::DEBUG_OVERLAY) {
            continue;
        }
        stack.extend(node.children().into_iter().rev());
        out.push(node);
    }
    out
}
