//! Event binder - handler props to emitter listeners.
//!
//! Handler names are normalized before registration: an `on` prefix is
//! stripped when followed by an uppercase letter (`onClick` → `click`), and
//! the rest is lower-cased. Each listener's removal is registered with the
//! active scope.

use super::types::EventHandlers;
use crate::engine::on_cleanup;
use crate::scene::{ListenerId, SceneNode};
use crate::types::EventMode;

/// Canonical emitter name for a handler key.
pub fn normalize_event_name(name: &str) -> String {
    let bytes = name.as_bytes();
    let stripped = if bytes.len() > 2 && name.starts_with("on") && bytes[2].is_ascii_uppercase() {
        &name[2..]
    } else {
        name
    };
    stripped.to_lowercase()
}

/// Register every handler on `node`. Returns the listener ids in order.
pub fn bind_events(node: &SceneNode, handlers: EventHandlers) -> Vec<ListenerId> {
    let mut ids = Vec::with_capacity(handlers.len());
    for (name, listener) in handlers {
        let event = normalize_event_name(&name);
        let id = node.on_listener(&event, listener);

        let target = node.downgrade();
        on_cleanup(move || {
            if let Some(node) = target.upgrade() {
                node.off(id);
            }
        });
        ids.push(id);
    }
    ids
}

/// Event mode to assign, if any.
///
/// - explicit mode always wins
/// - `interactive: Some(true)` means `Static`
/// - `interactive: Some(false)` means `Passive` (no automatic upgrade)
/// - otherwise nodes with handlers become `Static`, others are left alone
pub fn resolve_event_mode(
    has_handlers: bool,
    event_mode: Option<EventMode>,
    interactive: Option<bool>,
) -> Option<EventMode> {
    match (event_mode, interactive) {
        (Some(mode), _) => Some(mode),
        (None, Some(true)) => Some(EventMode::Static),
        (None, Some(false)) => Some(EventMode::Passive),
        (None, None) if has_handlers => Some(EventMode::Static),
        (None, None) => None,
    }
}
