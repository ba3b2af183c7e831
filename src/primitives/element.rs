//! Element factory - element description to live scene node.
//!
//! # Order of wiring
//!
//! 1. resolve the tag (unknown tag: error, nothing allocated)
//! 2. construct the node and attach its children (all-or-nothing)
//! 3. hand the node to the active scope
//! 4. bind scalar props (literal once, accessors through effects)
//! 5. register event listeners, then settle the event mode
//! 6. start the draw effect (graphics) and the texture load (sprites)
//! 7. call `node_ref`
//!
//! Everything registered in steps 3-6 belongs to the active scope; disposing
//! it stops the effects, removes the listeners and destroys the node.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{effect, untrack};

use super::bind::bind_field;
use super::children::append_children;
use super::events::{bind_events, resolve_event_mode};
use super::texture::bind_texture;
use super::types::{DrawCallback, NodeProps};
use crate::engine::{adopt_node, on_cleanup, Intrinsic, KindProp, Scope};
use crate::error::ElementError;
use crate::scene::SceneNode;

// =============================================================================
// Factory
// =============================================================================

/// Create a scene node from an intrinsic tag and its props.
///
/// # Errors
///
/// [`ElementError::UnknownIntrinsic`] if `tag` is not an intrinsic (the
/// message names the tag), [`ElementError::Child`] if a child entry cannot
/// be attached.
///
/// # Example
///
/// ```
/// use spark_canvas::{create_scene_node, NodeProps};
/// use spark_signals::signal;
///
/// let x = signal(10.0);
/// let node = create_scene_node("container", NodeProps::new().x(x.clone()).y(20.0)).unwrap();
/// assert_eq!(node.x(), 10.0);
///
/// x.set(50.0);
/// assert_eq!(node.x(), 50.0);
/// ```
pub fn create_scene_node(tag: &str, props: NodeProps) -> Result<SceneNode, ElementError> {
    let intrinsic =
        Intrinsic::from_tag(tag).ok_or_else(|| ElementError::UnknownIntrinsic(tag.to_string()))?;
    create_intrinsic(intrinsic, props)
}

/// Create a scene node for an already-resolved intrinsic.
pub fn create_intrinsic(intrinsic: Intrinsic, props: NodeProps) -> Result<SceneNode, ElementError> {
    let NodeProps {
        label,
        x,
        y,
        scale,
        rotation,
        alpha,
        visible,
        tint,
        anchor,
        width,
        height,
        text,
        font_size,
        event_mode,
        interactive,
        handlers,
        draw,
        texture,
        node_ref,
        children,
    } = props;

    let node = intrinsic.create();
    append_children(&node, children)?;
    adopt_node(&node);

    // Common fields
    bind_field!(node, label, |n, v| n.set_label(Some(v)));
    bind_field!(node, x, SceneNode::set_x);
    bind_field!(node, y, SceneNode::set_y);
    bind_field!(node, scale, SceneNode::set_scale);
    bind_field!(node, rotation, SceneNode::set_rotation);
    bind_field!(node, alpha, SceneNode::set_alpha);
    bind_field!(node, visible, SceneNode::set_visible);

    // Kind-specific fields
    bind_field!(node, tint.filter(|_| supports(intrinsic, KindProp::Tint)), |n, v| {
        n.set_tint(v);
    });
    bind_field!(node, anchor.filter(|_| supports(intrinsic, KindProp::Anchor)), |n, v| {
        n.set_anchor(v);
    });
    bind_field!(node, width.filter(|_| supports(intrinsic, KindProp::Width)), |n, v| {
        n.set_width(v);
    });
    bind_field!(node, height.filter(|_| supports(intrinsic, KindProp::Height)), |n, v| {
        n.set_height(v);
    });
    bind_field!(node, text.filter(|_| supports(intrinsic, KindProp::Text)), |n, v: String| {
        n.set_text(v);
    });
    bind_field!(node, font_size.filter(|_| supports(intrinsic, KindProp::FontSize)), |n, v| {
        n.set_font_size(v);
    });

    // Events
    let has_handlers = !handlers.is_empty();
    bind_events(&node, handlers);
    if let Some(mode) = resolve_event_mode(has_handlers, event_mode, interactive) {
        node.set_event_mode(mode);
    }

    if let Some(draw) = draw.filter(|_| supports(intrinsic, KindProp::Draw)) {
        bind_draw(&node, draw);
    }
    if let Some(source) = texture.filter(|_| supports(intrinsic, KindProp::Texture)) {
        bind_texture(&node, source);
    }

    if let Some(node_ref) = node_ref {
        untrack(|| node_ref(&node));
    }

    tracing::trace!(tag = intrinsic.tag(), "scene node created");
    Ok(node)
}

// =============================================================================
// Helpers
// =============================================================================

/// Whether `intrinsic` takes `prop`; warns when it does not.
fn supports(intrinsic: Intrinsic, prop: KindProp) -> bool {
    let supported = intrinsic.accepts(prop);
    if !supported {
        tracing::warn!(
            tag = intrinsic.tag(),
            prop = prop.as_str(),
            "prop not supported by this element, ignored"
        );
    }
    supported
}

/// Run `draw` in an effect: once now, then `clear()` + redraw on every
/// change of what it read.
///
/// Each run gets its own scope. Before a redraw the previous run's scope is
/// disposed, so nodes and bindings created while drawing last one frame.
fn bind_draw(node: &SceneNode, draw: DrawCallback) {
    let target = node.downgrade();
    let frame: Rc<RefCell<Option<Scope>>> = Rc::default();
    {
        let frame = frame.clone();
        on_cleanup(move || {
            let current = frame.borrow_mut().take();
            if let Some(scope) = current {
                scope.dispose();
            }
        });
    }

    let mut first_run = true;
    // Owned by the active scope.
    let _stop = effect(move || {
        let Some(node) = target.upgrade() else {
            return;
        };
        if node.is_destroyed() {
            return;
        }

        let previous = frame.borrow_mut().take();
        if let Some(previous) = previous {
            previous.dispose();
        }
        if !first_run {
            node.clear();
        }
        first_run = false;

        let scope = Scope::new();
        scope.run(|| draw(&node));
        *frame.borrow_mut() = Some(scope);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::primitives::{Child, Prop};
    use crate::scene::SceneEvent;
    use crate::state::assets::{reset_assets, set_spawner, set_texture_loader_fn};
    use crate::types::{EventMode, NodeKind, Rect, Rgba};
    use futures::executor::LocalPool;
    use futures::future::{self, FutureExt};
    use spark_signals::signal;
    use std::cell::Cell;

    fn setup() -> Scope {
        Scope::new()
    }

    #[test]
    fn test_unknown_tag() {
        let scope = setup();
        let err = scope
            .run(|| create_scene_node("UnknownTag", NodeProps::new()))
            .unwrap_err();
        assert!(err.to_string().contains("UnknownTag"));
    }

    #[test]
    fn test_each_tag_creates_its_kind() {
        let scope = setup();
        scope.run(|| {
            for (tag, kind) in [
                ("container", NodeKind::Container),
                ("graphics", NodeKind::Graphics),
                ("sprite", NodeKind::Sprite),
                ("text", NodeKind::Text),
            ] {
                assert_eq!(create_scene_node(tag, NodeProps::new()).unwrap().kind(), kind);
            }
        });
    }

    #[test]
    fn test_literal_props() {
        let scope = setup();
        let node = scope
            .run(|| {
                create_scene_node(
                    "container",
                    NodeProps::new().x(100.0).y(200.0).alpha(0.5).label("hud"),
                )
            })
            .unwrap();

        assert_eq!(node.x(), 100.0);
        assert_eq!(node.y(), 200.0);
        assert_eq!(node.alpha(), 0.5);
        assert_eq!(node.label().as_deref(), Some("hud"));

        scope.dispose();
        assert!(node.is_destroyed());
    }

    #[test]
    fn test_missing_prop_keeps_default() {
        let scope = setup();
        let node = scope
            .run(|| create_scene_node("container", NodeProps { x: None, ..Default::default() }))
            .unwrap();
        assert_eq!(node.x(), 0.0);
    }

    #[test]
    fn test_reactive_prop_tracks_signal() {
        let scope = setup();
        let x = signal(10.0);
        let node = scope
            .run(|| {
                let x = x.clone();
                create_scene_node(
                    "container",
                    NodeProps {
                        x: Some(Prop::getter(move || x.get())),
                        ..Default::default()
                    },
                )
            })
            .unwrap();

        assert_eq!(node.x(), 10.0);
        x.set(50.0);
        assert_eq!(node.x(), 50.0);
    }

    #[test]
    fn test_handler_makes_node_interactive() {
        let scope = setup();
        let clicks = Rc::new(Cell::new(0));
        let node = scope
            .run(|| {
                let clicks = clicks.clone();
                create_scene_node(
                    "graphics",
                    NodeProps::new().on("onClick", move |_| clicks.set(clicks.get() + 1)),
                )
            })
            .unwrap();

        assert_eq!(node.event_mode(), EventMode::Static);
        node.emit(&SceneEvent::new("click"));
        assert_eq!(clicks.get(), 1);
        node.emit(&SceneEvent::new("click"));
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn test_interactive_false_suppresses_auto_mode() {
        let scope = setup();
        let node = scope
            .run(|| {
                create_scene_node(
                    "graphics",
                    NodeProps::new().interactive(false).on("click", |_| {}),
                )
            })
            .unwrap();
        assert_ne!(node.event_mode(), EventMode::Static);
        assert_eq!(node.listener_count("click"), 1);
    }

    #[test]
    fn test_explicit_event_mode_wins() {
        let scope = setup();
        let node = scope
            .run(|| {
                create_scene_node(
                    "graphics",
                    NodeProps::new().event_mode(EventMode::Dynamic).on("click", |_| {}),
                )
            })
            .unwrap();
        assert_eq!(node.event_mode(), EventMode::Dynamic);

        let plain = scope.run(|| create_scene_node("graphics", NodeProps::new())).unwrap();
        assert_eq!(plain.event_mode(), EventMode::Passive);
    }

    #[test]
    fn test_interactive_without_handlers_is_static() {
        let scope = setup();
        let node = scope
            .run(|| create_scene_node("sprite", NodeProps::new().interactive(true)))
            .unwrap();
        assert_eq!(node.event_mode(), EventMode::Static);
        assert_eq!(node.listener_count("click"), 0);
    }

    #[test]
    fn test_draw_reruns_after_clear() {
        let scope = setup();
        let size = signal(10.0);
        let runs = Rc::new(Cell::new(0));
        let commands_seen = Rc::new(RefCell::new(Vec::new()));

        let node = scope
            .run(|| {
                let (size, runs, commands_seen) = (size.clone(), runs.clone(), commands_seen.clone());
                create_scene_node(
                    "graphics",
                    NodeProps::new().draw(move |g| {
                        runs.set(runs.get() + 1);
                        // Previous drawing must already be gone
                        commands_seen.borrow_mut().push(g.command_count());
                        let side = size.get();
                        g.with_graphics(|ctx| {
                            ctx.rect(Rect::new(0.0, 0.0, side, side)).fill(Rgba::RED);
                        });
                    }),
                )
            })
            .unwrap();

        assert_eq!(runs.get(), 1);
        size.set(20.0);
        assert_eq!(runs.get(), 2);
        size.set(30.0);
        assert_eq!(runs.get(), 3);

        assert_eq!(*commands_seen.borrow(), vec![0, 0, 0]);
        assert_eq!(node.command_count(), 1);
        assert_eq!(node.bounds(), Some(Rect::new(0.0, 0.0, 30.0, 30.0)));

        scope.dispose();
        size.set(40.0);
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_redraw_releases_previous_run() {
        let scope = setup();
        let size = signal(1.0);
        let offset = signal(0.0);
        let created: Rc<RefCell<Vec<SceneNode>>> = Rc::default();
        let binding_runs = Rc::new(Cell::new(0));

        scope.run(|| {
            let (size, offset) = (size.clone(), offset.clone());
            let (created, binding_runs) = (created.clone(), binding_runs.clone());
            create_scene_node(
                "graphics",
                NodeProps::new().draw(move |_| {
                    let _ = size.get();
                    let (offset, binding_runs) = (offset.clone(), binding_runs.clone());
                    let child = create_scene_node(
                        "container",
                        NodeProps::new().x(Prop::getter(move || {
                            binding_runs.set(binding_runs.get() + 1);
                            offset.get()
                        })),
                    )
                    .unwrap();
                    created.borrow_mut().push(child);
                }),
            )
            .unwrap();
        });

        for step in 2..=11 {
            size.set(f64::from(step));
        }
        // One initial binding run per draw run
        assert_eq!(binding_runs.get(), 11);
        {
            let created = created.borrow();
            assert_eq!(created.len(), 11);
            assert_eq!(created.iter().filter(|n| !n.is_destroyed()).count(), 1);
        }

        // Only the latest run's binding is still listening
        offset.set(5.0);
        assert_eq!(binding_runs.get(), 12);
        assert_eq!(created.borrow().last().map(SceneNode::x), Some(5.0));

        scope.dispose();
        assert!(created.borrow().iter().all(SceneNode::is_destroyed));
    }

    #[test]
    fn test_pending_texture_wins_over_visible() {
        reset_assets();
        let mut pool = LocalPool::new();
        set_spawner(pool.spawner());
        set_texture_loader_fn(|_: &crate::scene::TextureSource| future::pending().boxed_local());

        let scope = setup();
        let shown = signal(true);
        let sprite = scope
            .run(|| {
                create_scene_node(
                    "sprite",
                    NodeProps::new().visible(shown.clone()).texture("a.png"),
                )
            })
            .unwrap();

        assert!(!sprite.visible());
        shown.set(false);
        shown.set(true);
        pool.run_until_stalled();

        assert!(!sprite.visible());
        assert_eq!(sprite.texture(), None);
        assert!(sprite.requested_visible());
    }

    #[test]
    fn test_kind_specific_props_ignored_on_other_kinds() {
        let scope = setup();
        let draws = Rc::new(Cell::new(0));
        let node = scope
            .run(|| {
                let draws = draws.clone();
                create_scene_node(
                    "container",
                    NodeProps::new()
                        .text("nope")
                        .tint(Rgba::RED)
                        .draw(move |_| draws.set(draws.get() + 1)),
                )
            })
            .unwrap();

        assert_eq!(draws.get(), 0);
        assert_eq!(node.tint(), None);
        assert_eq!(node.text_content(), None);
    }

    #[test]
    fn test_text_props() {
        let scope = setup();
        let message = signal(String::from("hello"));
        let node = scope
            .run(|| {
                create_scene_node(
                    "text",
                    NodeProps::new().text(message.clone()).font_size(24.0).tint(Rgba::YELLOW),
                )
            })
            .unwrap();

        assert_eq!(node.text_content().as_deref(), Some("hello"));
        assert_eq!(node.font_size(), Some(24.0));
        assert_eq!(node.tint(), Some(Rgba::YELLOW));

        message.set("bye".to_string());
        assert_eq!(node.text_content().as_deref(), Some("bye"));
    }

    #[test]
    fn test_children_filtered_and_appended() {
        let scope = setup();
        let (parent, child) = scope.run(|| {
            let child = create_scene_node("sprite", NodeProps::new()).unwrap();
            let parent = create_scene_node(
                "container",
                NodeProps::new().children(vec![
                    Child::Empty,
                    Child::Node(child.clone()),
                    Child::Empty,
                    Child::Empty,
                ]),
            )
            .unwrap();
            (parent, child)
        });

        assert_eq!(parent.children(), vec![child.clone()]);
        assert_eq!(child.parent(), Some(parent));
    }

    #[test]
    fn test_destroyed_child_rejected_without_registration() {
        let scope = setup();
        let dead = SceneNode::container();
        dead.destroy();

        let result = scope.run(|| {
            create_scene_node(
                "container",
                NodeProps::new().on("click", |_| {}).x(signal(1.0)).child(dead),
            )
        });

        assert_eq!(result.unwrap_err(), ElementError::Child(SceneError::DestroyedChild));
    }

    #[test]
    fn test_node_ref_called_once_with_node() {
        let scope = setup();
        let seen: Rc<RefCell<Vec<SceneNode>>> = Rc::new(RefCell::new(Vec::new()));
        let node = scope
            .run(|| {
                let seen = seen.clone();
                create_scene_node(
                    "container",
                    NodeProps::new().node_ref(move |node| seen.borrow_mut().push(node.clone())),
                )
            })
            .unwrap();

        assert_eq!(*seen.borrow(), vec![node]);
    }

    #[test]
    fn test_teardown_destroys_and_silences() {
        let scope = setup();
        let x = signal(0.0);
        let clicks = Rc::new(Cell::new(0));
        let node = scope
            .run(|| {
                let clicks = clicks.clone();
                create_scene_node(
                    "graphics",
                    NodeProps::new()
                        .x(x.clone())
                        .on("click", move |_| clicks.set(clicks.get() + 1)),
                )
            })
            .unwrap();

        scope.dispose();
        assert!(node.is_destroyed());
        x.set(5.0);
        assert_eq!(node.x(), 0.0);

        node.emit(&SceneEvent::new("click"));
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_without_scope_node_still_works() {
        let x = signal(1.0);
        let node = create_scene_node("container", NodeProps::new().x(x.clone())).unwrap();
        x.set(2.0);
        assert_eq!(node.x(), 2.0);
        assert!(!node.is_destroyed());
    }
}
