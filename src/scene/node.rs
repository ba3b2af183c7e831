//! Scene nodes - the retained-mode tree.
//!
//! A [`SceneNode`] is a cheap, clonable handle (`Rc<RefCell<..>>`). A parent
//! holds strong handles to its children; a child refers back to its parent
//! weakly, so dropping the last handle to a detached root frees the subtree.
//!
//! Nodes are never freed explicitly. [`SceneNode::destroy`] marks the node
//! and its descendants destroyed, detaches them and drops their content and
//! listeners; handles held elsewhere stay valid but inert.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use kurbo::{Affine, Point, Rect, Vec2};

use super::emitter::{EventEmitter, ListenerId, SceneEvent};
use super::graphics::GraphicsContext;
use super::texture::{Texture, TextureSource, TextureState};
use crate::error::SceneError;
use crate::types::{EventMode, NodeFlags, NodeKind, Rgba};

/// Default text size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

// Text metrics estimate (no font shaping here): advance per glyph and line
// height, both as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.6;
const LINE_HEIGHT: f64 = 1.2;

// =============================================================================
// Node Data
// =============================================================================

struct SpriteContent {
    texture: Option<Texture>,
    state: TextureState,
    request: u64,
    anchor: Vec2,
    tint: Rgba,
    width: Option<f64>,
    height: Option<f64>,
}

struct TextContent {
    text: String,
    font_size: f64,
    tint: Rgba,
}

enum Content {
    Container,
    Graphics(GraphicsContext),
    Sprite(SpriteContent),
    Text(TextContent),
}

impl Content {
    fn new(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Container => Content::Container,
            NodeKind::Graphics => Content::Graphics(GraphicsContext::new()),
            NodeKind::Sprite => Content::Sprite(SpriteContent {
                texture: None,
                state: TextureState::Empty,
                request: 0,
                anchor: Vec2::ZERO,
                tint: Rgba::WHITE,
                width: None,
                height: None,
            }),
            NodeKind::Text => Content::Text(TextContent {
                text: String::new(),
                font_size: DEFAULT_FONT_SIZE,
                tint: Rgba::WHITE,
            }),
        }
    }

    /// A sprite without a settled texture stays hidden whatever its
    /// requested visibility.
    fn holds_hidden(&self) -> bool {
        matches!(
            self,
            Content::Sprite(SpriteContent {
                state: TextureState::Loading(_) | TextureState::Failed(_),
                ..
            })
        )
    }

    fn kind(&self) -> NodeKind {
        match self {
            Content::Container => NodeKind::Container,
            Content::Graphics(_) => NodeKind::Graphics,
            Content::Sprite(_) => NodeKind::Sprite,
            Content::Text(_) => NodeKind::Text,
        }
    }

    /// Extent of the node's own content, in local space.
    fn bounds(&self) -> Option<Rect> {
        match self {
            Content::Container => None,
            Content::Graphics(graphics) => graphics.local_bounds(),
            Content::Sprite(sprite) => {
                let texture = sprite.texture.as_ref()?;
                let width = sprite.width.unwrap_or(f64::from(texture.width()));
                let height = sprite.height.unwrap_or(f64::from(texture.height()));
                let x0 = -sprite.anchor.x * width;
                let y0 = -sprite.anchor.y * height;
                Some(Rect::new(x0, y0, x0 + width, y0 + height))
            }
            Content::Text(text) => {
                if text.text.is_empty() {
                    return None;
                }
                let columns = text
                    .text
                    .lines()
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0);
                let rows = text.text.lines().count().max(1);
                let width = columns as f64 * text.font_size * GLYPH_ADVANCE;
                let height = rows as f64 * text.font_size * LINE_HEIGHT;
                Some(Rect::new(0.0, 0.0, width, height))
            }
        }
    }
}

struct NodeData {
    flags: NodeFlags,
    label: Option<String>,
    position: Point,
    scale: Vec2,
    rotation: f64,
    alpha: f64,
    // Requested visibility; see `SceneNode::visible` for the effective value.
    visible: bool,
    event_mode: EventMode,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<SceneNode>,
    emitter: EventEmitter,
    content: Content,
}

impl NodeData {
    fn is_shown(&self) -> bool {
        self.visible && !self.content.holds_hidden()
    }

    fn local_transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

// =============================================================================
// Handles
// =============================================================================

/// Handle to a node in the scene graph.
#[derive(Clone)]
pub struct SceneNode {
    inner: Rc<RefCell<NodeData>>,
}

/// Non-owning handle to a node.
#[derive(Clone)]
pub struct WeakSceneNode {
    inner: Weak<RefCell<NodeData>>,
}

impl WeakSceneNode {
    pub fn upgrade(&self) -> Option<SceneNode> {
        self.inner.upgrade().map(|inner| SceneNode { inner })
    }
}

impl PartialEq for SceneNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for SceneNode {}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(data) => f
                .debug_struct("SceneNode")
                .field("kind", &data.content.kind())
                .field("label", &data.label)
                .field("children", &data.children.len())
                .field("destroyed", &data.flags.contains(NodeFlags::DESTROYED))
                .finish(),
            Err(_) => f.write_str("SceneNode { <borrowed> }"),
        }
    }
}

// =============================================================================
// Construction & Identity
// =============================================================================

impl SceneNode {
    /// Create a detached node with default fields.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeData {
                flags: NodeFlags::NONE,
                label: None,
                position: Point::ZERO,
                scale: Vec2::new(1.0, 1.0),
                rotation: 0.0,
                alpha: 1.0,
                visible: true,
                event_mode: EventMode::default(),
                parent: Weak::new(),
                children: Vec::new(),
                emitter: EventEmitter::new(),
                content: Content::new(kind),
            })),
        }
    }

    pub fn container() -> Self {
        Self::new(NodeKind::Container)
    }

    pub fn graphics() -> Self {
        Self::new(NodeKind::Graphics)
    }

    pub fn sprite() -> Self {
        Self::new(NodeKind::Sprite)
    }

    pub fn text(text: impl Into<String>) -> Self {
        let node = Self::new(NodeKind::Text);
        node.set_text(text);
        node
    }

    pub fn kind(&self) -> NodeKind {
        self.inner.borrow().content.kind()
    }

    pub fn downgrade(&self) -> WeakSceneNode {
        WeakSceneNode {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn flags(&self) -> NodeFlags {
        self.inner.borrow().flags
    }

    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.inner.borrow().flags.contains(flag)
    }

    pub fn insert_flags(&self, flags: NodeFlags) {
        self.inner.borrow_mut().flags.insert(flags);
    }

    pub fn is_destroyed(&self) -> bool {
        self.has_flag(NodeFlags::DESTROYED)
    }
}

// =============================================================================
// Visual Fields
// =============================================================================

impl SceneNode {
    pub fn x(&self) -> f64 {
        self.inner.borrow().position.x
    }

    pub fn set_x(&self, x: f64) {
        self.inner.borrow_mut().position.x = x;
    }

    pub fn y(&self) -> f64 {
        self.inner.borrow().position.y
    }

    pub fn set_y(&self, y: f64) {
        self.inner.borrow_mut().position.y = y;
    }

    pub fn position(&self) -> Point {
        self.inner.borrow().position
    }

    pub fn set_position(&self, position: Point) {
        self.inner.borrow_mut().position = position;
    }

    pub fn scale(&self) -> Vec2 {
        self.inner.borrow().scale
    }

    pub fn set_scale(&self, scale: Vec2) {
        self.inner.borrow_mut().scale = scale;
    }

    /// Rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.inner.borrow().rotation
    }

    pub fn set_rotation(&self, rotation: f64) {
        self.inner.borrow_mut().rotation = rotation;
    }

    pub fn alpha(&self) -> f64 {
        self.inner.borrow().alpha
    }

    pub fn set_alpha(&self, alpha: f64) {
        self.inner.borrow_mut().alpha = alpha;
    }

    /// Effective visibility: false while a sprite's texture is loading or
    /// failed to load, even if [`set_visible(true)`](Self::set_visible)
    /// was requested.
    pub fn visible(&self) -> bool {
        self.inner.borrow().is_shown()
    }

    /// Visibility as last requested, ignoring texture state.
    pub fn requested_visible(&self) -> bool {
        self.inner.borrow().visible
    }

    pub fn set_visible(&self, visible: bool) {
        self.inner.borrow_mut().visible = visible;
    }

    pub fn label(&self) -> Option<String> {
        self.inner.borrow().label.clone()
    }

    pub fn set_label(&self, label: Option<String>) {
        self.inner.borrow_mut().label = label;
    }

    pub fn event_mode(&self) -> EventMode {
        self.inner.borrow().event_mode
    }

    pub fn set_event_mode(&self, mode: EventMode) {
        self.inner.borrow_mut().event_mode = mode;
    }

    /// Tint of a sprite or text node. `None` for other kinds.
    pub fn tint(&self) -> Option<Rgba> {
        match &self.inner.borrow().content {
            Content::Sprite(sprite) => Some(sprite.tint),
            Content::Text(text) => Some(text.tint),
            _ => None,
        }
    }

    /// Set the tint. Returns false (and does nothing) for kinds without one.
    pub fn set_tint(&self, tint: Rgba) -> bool {
        match &mut self.inner.borrow_mut().content {
            Content::Sprite(sprite) => sprite.tint = tint,
            Content::Text(text) => text.tint = tint,
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Sprite
// =============================================================================

impl SceneNode {
    fn with_sprite<R>(&self, f: impl FnOnce(&SpriteContent) -> R) -> Option<R> {
        match &self.inner.borrow().content {
            Content::Sprite(sprite) => Some(f(sprite)),
            _ => None,
        }
    }

    fn with_sprite_mut<R>(&self, f: impl FnOnce(&mut SpriteContent) -> R) -> Option<R> {
        match &mut self.inner.borrow_mut().content {
            Content::Sprite(sprite) => Some(f(sprite)),
            _ => None,
        }
    }

    pub fn anchor(&self) -> Option<Vec2> {
        self.with_sprite(|sprite| sprite.anchor)
    }

    pub fn set_anchor(&self, anchor: Vec2) -> bool {
        self.with_sprite_mut(|sprite| sprite.anchor = anchor).is_some()
    }

    /// Display width: explicit width, else the texture's width.
    pub fn width(&self) -> Option<f64> {
        self.with_sprite(|sprite| {
            sprite
                .width
                .or_else(|| sprite.texture.as_ref().map(|t| f64::from(t.width())))
        })
        .flatten()
    }

    pub fn set_width(&self, width: f64) -> bool {
        self.with_sprite_mut(|sprite| sprite.width = Some(width)).is_some()
    }

    /// Display height: explicit height, else the texture's height.
    pub fn height(&self) -> Option<f64> {
        self.with_sprite(|sprite| {
            sprite
                .height
                .or_else(|| sprite.texture.as_ref().map(|t| f64::from(t.height())))
        })
        .flatten()
    }

    pub fn set_height(&self, height: f64) -> bool {
        self.with_sprite_mut(|sprite| sprite.height = Some(height)).is_some()
    }

    pub fn texture(&self) -> Option<Texture> {
        self.with_sprite(|sprite| sprite.texture.clone()).flatten()
    }

    /// Assign a texture directly, bypassing the loader.
    pub fn set_texture(&self, texture: Option<Texture>) -> bool {
        self.with_sprite_mut(|sprite| {
            sprite.state = if texture.is_some() {
                TextureState::Loaded
            } else {
                TextureState::Empty
            };
            sprite.texture = texture;
        })
        .is_some()
    }

    pub fn texture_state(&self) -> TextureState {
        self.with_sprite(|sprite| sprite.state.clone())
            .unwrap_or_default()
    }

    /// Start a new texture request: bumps the request counter and drops the
    /// current texture. The node reads as hidden until the request settles
    /// successfully. Returns the new request number.
    pub fn begin_texture_request(&self, source: &TextureSource) -> Option<u64> {
        self.with_sprite_mut(|sprite| {
            sprite.request += 1;
            sprite.texture = None;
            sprite.state = TextureState::Loading(source.clone());
            sprite.request
        })
    }

    /// The most recent request number (0 if none was made).
    pub fn texture_request(&self) -> u64 {
        self.with_sprite(|sprite| sprite.request).unwrap_or(0)
    }

    /// Settle request `request`. Ignored unless it is still the latest one
    /// and the node is alive; returns whether the result was applied.
    pub fn finish_texture_request(
        &self,
        request: u64,
        result: Result<Texture, crate::error::LoadError>,
    ) -> bool {
        if self.is_destroyed() || self.texture_request() != request {
            return false;
        }

        self.with_sprite_mut(|sprite| match result {
            Ok(texture) => {
                sprite.texture = Some(texture);
                sprite.state = TextureState::Loaded;
            }
            Err(error) => {
                sprite.state = TextureState::Failed(error);
            }
        });
        true
    }
}

// =============================================================================
// Text
// =============================================================================

impl SceneNode {
    /// Text content. `None` for non-text nodes.
    pub fn text_content(&self) -> Option<String> {
        match &self.inner.borrow().content {
            Content::Text(text) => Some(text.text.clone()),
            _ => None,
        }
    }

    pub fn set_text(&self, value: impl Into<String>) -> bool {
        match &mut self.inner.borrow_mut().content {
            Content::Text(text) => {
                text.text = value.into();
                true
            }
            _ => false,
        }
    }

    pub fn font_size(&self) -> Option<f64> {
        match &self.inner.borrow().content {
            Content::Text(text) => Some(text.font_size),
            _ => None,
        }
    }

    pub fn set_font_size(&self, size: f64) -> bool {
        match &mut self.inner.borrow_mut().content {
            Content::Text(text) => {
                text.font_size = size;
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// Graphics
// =============================================================================

impl SceneNode {
    /// Run `f` against this node's drawing context. `None` for non-graphics
    /// nodes.
    ///
    /// The node is mutably borrowed while `f` runs: do not read or write
    /// other fields of the same node from inside `f`.
    pub fn with_graphics<R>(&self, f: impl FnOnce(&mut GraphicsContext) -> R) -> Option<R> {
        match &mut self.inner.borrow_mut().content {
            Content::Graphics(graphics) => Some(f(graphics)),
            _ => None,
        }
    }

    /// Clear all drawing commands. No-op for non-graphics nodes.
    pub fn clear(&self) {
        self.with_graphics(|g| {
            g.clear();
        });
    }

    pub fn command_count(&self) -> usize {
        match &self.inner.borrow().content {
            Content::Graphics(graphics) => graphics.command_count(),
            _ => 0,
        }
    }
}

// =============================================================================
// Hierarchy
// =============================================================================

impl SceneNode {
    pub fn parent(&self) -> Option<SceneNode> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| SceneNode { inner })
    }

    pub fn children(&self) -> Vec<SceneNode> {
        self.inner.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Whether `other` is a strict ancestor of this node.
    pub fn has_ancestor(&self, other: &SceneNode) -> bool {
        let mut current = self.parent();
        while let Some(node) = current {
            if node == *other {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Check that `child` could be attached here, without attaching it.
    pub fn can_add_child(&self, child: &SceneNode) -> Result<(), SceneError> {
        if self.is_destroyed() {
            return Err(SceneError::DestroyedParent);
        }
        if child.is_destroyed() {
            return Err(SceneError::DestroyedChild);
        }
        if child == self || self.has_ancestor(child) {
            return Err(SceneError::Cycle);
        }
        Ok(())
    }

    /// Append `child`, detaching it from any previous parent first.
    pub fn add_child(&self, child: &SceneNode) -> Result<(), SceneError> {
        self.can_add_child(child)?;
        child.remove_from_parent();
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().children.push(child.clone());
        Ok(())
    }

    /// Detach `child`. Returns false if it was not a child of this node.
    pub fn remove_child(&self, child: &SceneNode) -> bool {
        let removed = {
            let mut data = self.inner.borrow_mut();
            match data.children.iter().position(|c| c == child) {
                Some(index) => {
                    data.children.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            child.inner.borrow_mut().parent = Weak::new();
        }
        removed
    }

    /// Detach and return every child.
    pub fn remove_children(&self) -> Vec<SceneNode> {
        let children = std::mem::take(&mut self.inner.borrow_mut().children);
        for child in &children {
            child.inner.borrow_mut().parent = Weak::new();
        }
        children
    }

    pub fn remove_from_parent(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }
}

// =============================================================================
// Events
// =============================================================================

impl SceneNode {
    /// Listen for `name`.
    pub fn on<F>(&self, name: &str, listener: F) -> ListenerId
    where
        F: Fn(&SceneEvent) + 'static,
    {
        self.inner.borrow_mut().emitter.on(name, Rc::new(listener))
    }

    pub fn on_listener(&self, name: &str, listener: super::emitter::Listener) -> ListenerId {
        self.inner.borrow_mut().emitter.on(name, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().emitter.off(id)
    }

    /// Call every listener for `event.name`. Returns how many were called.
    pub fn emit(&self, event: &SceneEvent) -> usize {
        let listeners = self.inner.borrow().emitter.listeners(&event.name);
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.inner.borrow().emitter.listener_count(name)
    }
}

// =============================================================================
// Transforms, Bounds & Hit Testing
// =============================================================================

impl SceneNode {
    /// Translate, then rotate, then scale.
    pub fn local_transform(&self) -> Affine {
        self.inner.borrow().local_transform()
    }

    pub fn world_transform(&self) -> Affine {
        let mut transform = self.local_transform();
        let mut current = self.parent();
        while let Some(node) = current {
            transform = node.local_transform() * transform;
            current = node.parent();
        }
        transform
    }

    /// Extent of this node's own content in local space (children excluded).
    pub fn content_bounds(&self) -> Option<Rect> {
        self.inner.borrow().content.bounds()
    }

    /// World-space bounds of this node's content and its visible children.
    ///
    /// Subtrees flagged [`NodeFlags::DEBUG_OVERLAY`] never contribute.
    /// `None` when nothing in the subtree has extent, or once destroyed.
    pub fn bounds(&self) -> Option<Rect> {
        let parent_world = self
            .parent()
            .map(|parent| parent.world_transform())
            .unwrap_or(Affine::IDENTITY);
        self.subtree_bounds(parent_world)
    }

    fn subtree_bounds(&self, parent_world: Affine) -> Option<Rect> {
        let (world, own, children) = {
            let data = self.inner.borrow();
            if data.flags.contains(NodeFlags::DESTROYED) {
                return None;
            }
            (
                parent_world * data.local_transform(),
                data.content.bounds(),
                data.children.clone(),
            )
        };

        let mut bounds = own.map(|rect| world.transform_rect_bbox(rect));
        for child in &children {
            if !child.visible() || child.has_flag(NodeFlags::DEBUG_OVERLAY) {
                continue;
            }
            if let Some(child_bounds) = child.subtree_bounds(world) {
                bounds = Some(match bounds {
                    Some(rect) => rect.union(child_bounds),
                    None => child_bounds,
                });
            }
        }
        bounds
    }

    /// Topmost interactive node under `point` (world space).
    ///
    /// Invisible nodes and nodes in [`EventMode::None`] prune their whole
    /// subtree; passive nodes are skipped but their children are tested.
    pub fn hit_test(&self, point: Point) -> Option<SceneNode> {
        let (visible, mode, destroyed, children) = {
            let data = self.inner.borrow();
            (
                data.is_shown(),
                data.event_mode,
                data.flags.contains(NodeFlags::DESTROYED),
                data.children.clone(),
            )
        };
        if destroyed || !visible || mode == EventMode::None {
            return None;
        }

        if let Some(hit) = children.iter().rev().find_map(|child| child.hit_test(point)) {
            return Some(hit);
        }

        if mode.is_interactive() {
            let own = self.content_bounds()?;
            if self.world_transform().transform_rect_bbox(own).contains(point) {
                return Some(self.clone());
            }
        }
        None
    }
}

// =============================================================================
// Destruction
// =============================================================================

impl SceneNode {
    /// Destroy this node and every descendant. Idempotent.
    pub fn destroy(&self) {
        {
            let mut data = self.inner.borrow_mut();
            if data.flags.contains(NodeFlags::DESTROYED) {
                return;
            }
            data.flags.insert(NodeFlags::DESTROYED);
        }

        self.remove_from_parent();

        let children = {
            let mut data = self.inner.borrow_mut();
            data.emitter.clear();
            match &mut data.content {
                Content::Graphics(graphics) => {
                    graphics.clear();
                }
                Content::Sprite(sprite) => sprite.texture = None,
                _ => {}
            }
            std::mem::take(&mut data.children)
        };

        for child in children {
            child.inner.borrow_mut().parent = Weak::new();
            child.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_defaults() {
        let node = SceneNode::container();
        assert_eq!(node.kind(), NodeKind::Container);
        assert_eq!(node.position(), Point::ZERO);
        assert_eq!(node.scale(), Vec2::new(1.0, 1.0));
        assert_eq!(node.alpha(), 1.0);
        assert!(node.visible());
        assert_eq!(node.event_mode(), EventMode::Passive);
        assert_eq!(node.label(), None);
        assert_eq!(node.tint(), None);

        let text = SceneNode::text("hi");
        assert_eq!(text.font_size(), Some(DEFAULT_FONT_SIZE));
        assert_eq!(text.text_content().as_deref(), Some("hi"));
        assert_eq!(text.tint(), Some(Rgba::WHITE));
    }

    #[test]
    fn test_kind_specific_setters_reject_other_kinds() {
        let node = SceneNode::graphics();
        assert!(!node.set_text("x"));
        assert!(!node.set_anchor(Vec2::new(0.5, 0.5)));
        assert!(!node.set_tint(Rgba::RED));
        assert_eq!(node.begin_texture_request(&"a.png".into()), None);
    }

    #[test]
    fn test_add_and_remove_children() {
        let parent = SceneNode::container();
        let a = SceneNode::container();
        let b = SceneNode::container();

        parent.add_child(&a).unwrap();
        parent.add_child(&b).unwrap();
        assert_eq!(parent.children(), vec![a.clone(), b.clone()]);
        assert_eq!(a.parent(), Some(parent.clone()));

        assert!(parent.remove_child(&a));
        assert!(!parent.remove_child(&a));
        assert_eq!(a.parent(), None);
        assert_eq!(parent.child_count(), 1);
    }

    #[test]
    fn test_add_child_reparents() {
        let first = SceneNode::container();
        let second = SceneNode::container();
        let child = SceneNode::container();

        first.add_child(&child).unwrap();
        second.add_child(&child).unwrap();
        assert_eq!(first.child_count(), 0);
        assert_eq!(child.parent(), Some(second));
    }

    #[test]
    fn test_add_child_rejects_cycles_and_destroyed() {
        let root = SceneNode::container();
        let child = SceneNode::container();
        root.add_child(&child).unwrap();

        assert_eq!(root.add_child(&root), Err(SceneError::Cycle));
        assert_eq!(child.add_child(&root), Err(SceneError::Cycle));

        let dead = SceneNode::container();
        dead.destroy();
        assert_eq!(root.add_child(&dead), Err(SceneError::DestroyedChild));
        assert_eq!(dead.add_child(&SceneNode::container()), Err(SceneError::DestroyedParent));
    }

    #[test]
    fn test_destroy_cascades_and_detaches() {
        let root = SceneNode::container();
        let child = SceneNode::container();
        let grandchild = SceneNode::graphics();
        root.add_child(&child).unwrap();
        child.add_child(&grandchild).unwrap();

        let hits = Rc::new(Cell::new(0));
        {
            let hits = hits.clone();
            grandchild.on("click", move |_| hits.set(hits.get() + 1));
        }

        child.destroy();
        assert!(child.is_destroyed());
        assert!(grandchild.is_destroyed());
        assert!(!root.is_destroyed());
        assert_eq!(root.child_count(), 0);
        assert_eq!(grandchild.parent(), None);

        assert_eq!(grandchild.emit(&SceneEvent::new("click")), 0);
        assert_eq!(hits.get(), 0);

        // Idempotent
        child.destroy();
    }

    #[test]
    fn test_emit_calls_listeners_in_order() {
        let node = SceneNode::container();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b"] {
            let log = log.clone();
            node.on("tap", move |_| log.borrow_mut().push(tag));
        }
        assert_eq!(node.emit(&SceneEvent::new("tap")), 2);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_listener_may_remove_itself() {
        let node = SceneNode::container();
        let id = Rc::new(Cell::new(None));
        let calls = Rc::new(Cell::new(0));
        let registered = {
            let (node2, id, calls) = (node.clone(), id.clone(), calls.clone());
            node.on("tap", move |_| {
                calls.set(calls.get() + 1);
                if let Some(id) = id.get() {
                    node2.off(id);
                }
            })
        };
        id.set(Some(registered));

        node.emit(&SceneEvent::new("tap"));
        node.emit(&SceneEvent::new("tap"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_world_bounds_follow_transforms() {
        let root = SceneNode::container();
        root.set_position(Point::new(100.0, 50.0));

        let box_node = SceneNode::graphics();
        box_node.set_position(Point::new(10.0, 10.0));
        box_node.set_scale(Vec2::new(2.0, 2.0));
        box_node.with_graphics(|g| {
            g.rect(Rect::new(0.0, 0.0, 10.0, 5.0)).fill(Rgba::RED);
        });
        root.add_child(&box_node).unwrap();

        assert_eq!(box_node.bounds(), Some(Rect::new(110.0, 60.0, 130.0, 70.0)));
        assert_eq!(root.bounds(), box_node.bounds());

        box_node.set_visible(false);
        assert_eq!(root.bounds(), None);
    }

    #[test]
    fn test_sprite_bounds_use_texture_and_anchor() {
        let sprite = SceneNode::sprite();
        assert_eq!(sprite.bounds(), None);

        sprite.set_texture(Some(Texture::new("a.png", 20, 10)));
        sprite.set_anchor(Vec2::new(0.5, 0.5));
        assert_eq!(sprite.bounds(), Some(Rect::new(-10.0, -5.0, 10.0, 5.0)));
        assert_eq!(sprite.width(), Some(20.0));

        sprite.set_width(40.0);
        assert_eq!(sprite.bounds(), Some(Rect::new(-20.0, -5.0, 20.0, 5.0)));
    }

    #[test]
    fn test_text_bounds_estimate() {
        let text = SceneNode::text("abcd\nab");
        text.set_font_size(10.0);
        assert_eq!(text.bounds(), Some(Rect::new(0.0, 0.0, 24.0, 24.0)));

        assert_eq!(SceneNode::text("").bounds(), None);
    }

    #[test]
    fn test_texture_requests_are_ordered() {
        let sprite = SceneNode::sprite();
        let first = sprite.begin_texture_request(&"a.png".into()).unwrap();
        let second = sprite.begin_texture_request(&"b.png".into()).unwrap();
        assert!(!sprite.visible());

        assert!(!sprite.finish_texture_request(first, Ok(Texture::new("a.png", 1, 1))));
        assert_eq!(sprite.texture(), None);

        assert!(sprite.finish_texture_request(second, Ok(Texture::new("b.png", 2, 2))));
        assert_eq!(sprite.texture_state(), TextureState::Loaded);
        assert!(sprite.visible());
    }

    #[test]
    fn test_pending_texture_overrides_visibility() {
        let sprite = SceneNode::sprite();
        let request = sprite.begin_texture_request(&"a.png".into()).unwrap();

        sprite.set_visible(false);
        sprite.set_visible(true);
        assert!(!sprite.visible());
        assert!(sprite.requested_visible());

        // Hidden on request keeps it hidden after the load
        sprite.set_visible(false);
        assert!(sprite.finish_texture_request(request, Ok(Texture::new("a.png", 1, 1))));
        assert!(!sprite.visible());

        sprite.set_visible(true);
        assert!(sprite.visible());
    }

    #[test]
    fn test_failed_texture_stays_hidden() {
        let sprite = SceneNode::sprite();
        let request = sprite.begin_texture_request(&"a.png".into()).unwrap();
        sprite.finish_texture_request(request, Err(crate::error::LoadError::NoLoader));
        sprite.set_visible(true);
        assert!(!sprite.visible());

        sprite.set_texture(Some(Texture::new("b.png", 1, 1)));
        assert!(sprite.visible());
    }

    #[test]
    fn test_hit_test() {
        let root = SceneNode::container();
        let back = SceneNode::graphics();
        let front = SceneNode::graphics();
        for node in [&back, &front] {
            node.with_graphics(|g| {
                g.rect(Rect::new(0.0, 0.0, 10.0, 10.0)).fill(Rgba::RED);
            });
            root.add_child(node).unwrap();
        }

        // Passive by default
        assert_eq!(root.hit_test(Point::new(5.0, 5.0)), None);

        back.set_event_mode(EventMode::Static);
        front.set_event_mode(EventMode::Static);
        assert_eq!(root.hit_test(Point::new(5.0, 5.0)), Some(front.clone()));

        root.set_event_mode(EventMode::None);
        assert_eq!(root.hit_test(Point::new(5.0, 5.0)), None);
    }
}
