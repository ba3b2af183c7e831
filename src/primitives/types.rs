//! Primitive types - props, children and callbacks.
//!
//! These types describe one element: its scalar fields (each literal or
//! reactive), its event handlers, and the reserved keys (`children`, `draw`,
//! `texture`, `node_ref`).

use std::rc::Rc;

use spark_signals::Signal;
use crate::scene::{Listener, SceneEvent, SceneNode, TextureSource};
use crate::types::{EventMode, Rgba, Vec2};

pub use crate::engine::Cleanup;

// =============================================================================
// Callback Types
// =============================================================================

/// Drawing callback for graphics nodes.
///
/// Called with the node once at creation, then again (after `clear()`)
/// whenever a signal it read changes.
pub type DrawCallback = Rc<dyn Fn(&SceneNode)>;

/// Called once with the freshly created node.
pub type RefCallback = Box<dyn FnOnce(&SceneNode)>;

// =============================================================================
// Prop - Literal or reactive property
// =============================================================================

/// A property value that is either a literal or an accessor.
///
/// `Static` is assigned once. `Signal` and `Getter` are accessors: they are
/// read inside an effect, so the node field follows them.
#[derive(Clone)]
pub enum Prop<T: Clone + PartialEq + 'static> {
    /// Literal value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Derived accessor; reactive over every signal it reads.
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> Prop<T> {
    /// Wrap a closure as a reactive accessor.
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        Prop::Getter(Rc::new(f))
    }

    /// Read the current value (tracked if inside an effect).
    pub fn get(&self) -> T {
        match self {
            Prop::Static(v) => v.clone(),
            Prop::Signal(s) => s.get(),
            Prop::Getter(f) => f(),
        }
    }

    pub fn is_reactive(&self) -> bool {
        !matches!(self, Prop::Static(_))
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for Prop<T> {
    fn from(value: T) -> Self {
        Prop::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for Prop<T> {
    fn from(signal: Signal<T>) -> Self {
        Prop::Signal(signal)
    }
}

impl From<&str> for Prop<String> {
    fn from(value: &str) -> Self {
        Prop::Static(value.to_string())
    }
}

impl From<&str> for Prop<TextureSource> {
    fn from(value: &str) -> Self {
        Prop::Static(TextureSource::from(value))
    }
}

impl From<(f64, f64)> for Prop<Vec2> {
    fn from((x, y): (f64, f64)) -> Self {
        Prop::Static(Vec2::new(x, y))
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug + 'static> std::fmt::Debug for Prop<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prop::Static(v) => f.debug_tuple("Static").field(v).finish(),
            Prop::Signal(s) => f.debug_tuple("Signal").field(&s.get()).finish(),
            Prop::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

// =============================================================================
// Children
// =============================================================================

/// One entry of an element's child list.
///
/// `Empty` stands for the null/undefined/false entries conditional markup
/// produces; they are skipped. `Many` is a nested list (e.g. from a loop)
/// and is flattened in place.
#[derive(Debug, Clone, Default)]
pub enum Child {
    Node(SceneNode),
    #[default]
    Empty,
    Many(Vec<Child>),
}

impl From<SceneNode> for Child {
    fn from(node: SceneNode) -> Self {
        Child::Node(node)
    }
}

impl From<&SceneNode> for Child {
    fn from(node: &SceneNode) -> Self {
        Child::Node(node.clone())
    }
}

impl From<Option<SceneNode>> for Child {
    fn from(node: Option<SceneNode>) -> Self {
        node.map_or(Child::Empty, Child::Node)
    }
}

impl From<Vec<SceneNode>> for Child {
    fn from(nodes: Vec<SceneNode>) -> Self {
        Child::Many(nodes.into_iter().map(Child::Node).collect())
    }
}

impl From<Vec<Child>> for Child {
    fn from(children: Vec<Child>) -> Self {
        Child::Many(children)
    }
}

impl From<()> for Child {
    fn from(_: ()) -> Self {
        Child::Empty
    }
}

// =============================================================================
// Event Handlers
// =============================================================================

/// Event handlers in declaration order, keyed by event name as written
/// (e.g. `"onClick"`, `"click"`, `"pointerdown"`).
#[derive(Clone, Default)]
pub struct EventHandlers {
    handlers: Vec<(String, Listener)>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&SceneEvent) + 'static,
    {
        self.handlers.push((name.into(), Rc::new(handler)));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Listener)> {
        self.handlers.iter().map(|(name, listener)| (name.as_str(), listener))
    }
}

impl IntoIterator for EventHandlers {
    type Item = (String, Listener);
    type IntoIter = std::vec::IntoIter<(String, Listener)>;

    fn into_iter(self) -> Self::IntoIter {
        self.handlers.into_iter()
    }
}

// =============================================================================
// Node Props
// =============================================================================

/// Properties for an intrinsic element.
///
/// `None` means "not given": the node keeps its constructor default.
/// Fields that only apply to some kinds (`texture`, `anchor`, `width`,
/// `height` for sprites; `text`, `font_size` for text; `tint` for both;
/// `draw` for graphics) are ignored with a warning elsewhere.
///
/// # Example
///
/// ```
/// use spark_canvas::primitives::{NodeProps, Prop};
/// use spark_signals::signal;
///
/// let x = signal(10.0);
///
/// let props = NodeProps::new()
///     .x(x.clone())
///     .y(20.0)
///     .label("player")
///     .on("click", |_| println!("clicked"));
///
/// // Or as a struct literal
/// let props = NodeProps {
///     x: Some(Prop::getter(move || x.get() * 2.0)),
///     ..Default::default()
/// };
/// ```
#[derive(Default)]
pub struct NodeProps {
    // =========================================================================
    // Common
    // =========================================================================

    pub label: Option<Prop<String>>,
    pub x: Option<Prop<f64>>,
    pub y: Option<Prop<f64>>,
    pub scale: Option<Prop<Vec2>>,
    /// Radians.
    pub rotation: Option<Prop<f64>>,
    pub alpha: Option<Prop<f64>>,
    pub visible: Option<Prop<bool>>,

    // =========================================================================
    // Kind-specific
    // =========================================================================

    pub tint: Option<Prop<Rgba>>,
    pub anchor: Option<Prop<Vec2>>,
    pub width: Option<Prop<f64>>,
    pub height: Option<Prop<f64>>,
    pub text: Option<Prop<String>>,
    pub font_size: Option<Prop<f64>>,

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Explicit event mode. Wins over automatic interactivity.
    pub event_mode: Option<EventMode>,
    /// `Some(false)` disables automatic interactivity.
    pub interactive: Option<bool>,
    pub handlers: EventHandlers,

    // =========================================================================
    // Reserved
    // =========================================================================

    pub draw: Option<DrawCallback>,
    pub texture: Option<Prop<TextureSource>>,
    pub node_ref: Option<RefCallback>,
    pub children: Vec<Child>,
}

impl NodeProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<Prop<String>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn x(mut self, x: impl Into<Prop<f64>>) -> Self {
        self.x = Some(x.into());
        self
    }

    pub fn y(mut self, y: impl Into<Prop<f64>>) -> Self {
        self.y = Some(y.into());
        self
    }

    pub fn scale(mut self, scale: impl Into<Prop<Vec2>>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    pub fn rotation(mut self, rotation: impl Into<Prop<f64>>) -> Self {
        self.rotation = Some(rotation.into());
        self
    }

    pub fn alpha(mut self, alpha: impl Into<Prop<f64>>) -> Self {
        self.alpha = Some(alpha.into());
        self
    }

    pub fn visible(mut self, visible: impl Into<Prop<bool>>) -> Self {
        self.visible = Some(visible.into());
        self
    }

    pub fn tint(mut self, tint: impl Into<Prop<Rgba>>) -> Self {
        self.tint = Some(tint.into());
        self
    }

    pub fn anchor(mut self, anchor: impl Into<Prop<Vec2>>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn width(mut self, width: impl Into<Prop<f64>>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: impl Into<Prop<f64>>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn text(mut self, text: impl Into<Prop<String>>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn font_size(mut self, size: impl Into<Prop<f64>>) -> Self {
        self.font_size = Some(size.into());
        self
    }

    pub fn event_mode(mut self, mode: EventMode) -> Self {
        self.event_mode = Some(mode);
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    /// Add an event handler. `on("click", ..)` and `on("onClick", ..)` are
    /// equivalent.
    pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&SceneEvent) + 'static,
    {
        self.handlers.on(name, handler);
        self
    }

    pub fn draw(mut self, draw: impl Fn(&SceneNode) + 'static) -> Self {
        self.draw = Some(Rc::new(draw));
        self
    }

    pub fn texture(mut self, source: impl Into<Prop<TextureSource>>) -> Self {
        self.texture = Some(source.into());
        self
    }

    pub fn node_ref(mut self, f: impl FnOnce(&SceneNode) + 'static) -> Self {
        self.node_ref = Some(Box::new(f));
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Child>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::signal;

    #[test]
    fn test_prop_static_and_reactive() {
        let literal: Prop<f64> = 5.0.into();
        assert!(!literal.is_reactive());
        assert_eq!(literal.get(), 5.0);

        let s = signal(1.0);
        let from_signal: Prop<f64> = s.clone().into();
        assert!(from_signal.is_reactive());
        s.set(2.0);
        assert_eq!(from_signal.get(), 2.0);

        let getter = Prop::getter(move || s.get() * 10.0);
        assert_eq!(getter.get(), 20.0);
    }

    #[test]
    fn test_string_and_texture_conversions() {
        let label: Prop<String> = "hero".into();
        assert_eq!(label.get(), "hero");

        let source: Prop<TextureSource> = "a.png".into();
        assert_eq!(source.get().as_str(), "a.png");
    }

    #[test]
    fn test_child_conversions() {
        assert!(matches!(Child::from(None::<SceneNode>), Child::Empty));
        assert!(matches!(Child::from(SceneNode::container()), Child::Node(_)));
        let many = Child::from(vec![SceneNode::container(), SceneNode::container()]);
        assert!(matches!(many, Child::Many(ref list) if list.len() == 2));
    }

    #[test]
    fn test_builder_collects_handlers_and_children() {
        let props = NodeProps::new()
            .x(1.0)
            .on("click", |_| {})
            .on("pointerdown", |_| {})
            .child(SceneNode::container())
            .child(())
            .children(vec![SceneNode::sprite()]);

        assert!(props.x.is_some());
        assert!(props.y.is_none());
        assert_eq!(props.handlers.len(), 2);
        assert_eq!(props.children.len(), 3);
    }
}
