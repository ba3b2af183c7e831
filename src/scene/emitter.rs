//! Event emitter - named listener lists per node.
//!
//! Event names are case-sensitive here; the element factory lower-cases
//! handler names before registering them.

use std::rc::Rc;

use crate::types::Point;

// =============================================================================
// TYPES
// =============================================================================

/// An event delivered to node listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEvent {
    /// Event name, e.g. `"click"` or `"textureload"`.
    pub name: String,
    /// Pointer position in world space, for pointer events.
    pub position: Option<Point>,
}

impl SceneEvent {
    /// Create an event with no position.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
        }
    }

    /// Attach a world-space pointer position.
    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }
}

/// A node event listener.
///
/// `Rc<dyn Fn>` so listeners can be cloned out of the emitter before being
/// called.
pub type Listener = Rc<dyn Fn(&SceneEvent)>;

/// Handle returned by [`EventEmitter::on`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// =============================================================================
// EMITTER
// =============================================================================

/// Listener storage, in registration order.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<(String, ListenerId, Listener)>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a listener for `name`.
    pub fn on(&mut self, name: &str, listener: Listener) -> ListenerId {
        let id = self.next_id();
        self.listeners.push((name.to_string(), id, listener));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(_, listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Snapshot of the listeners for `name`, in registration order.
    pub fn listeners(&self, name: &str) -> Vec<Listener> {
        self.listeners
            .iter()
            .filter(|(event, _, _)| event == name)
            .map(|(_, _, listener)| listener.clone())
            .collect()
    }

    /// Number of listeners for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.iter().filter(|(event, _, _)| event == name).count()
    }

    /// Total number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
