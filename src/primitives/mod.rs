//! Primitives - element factory and its binders.
//!
//! - [`create_scene_node`] - tag + props → wired scene node
//! - [`bind_prop`] - literal-or-accessor property binding
//! - [`bind_events`] - handler props → emitter listeners
//! - [`bind_texture`] - asynchronous sprite textures
//! - [`append_children`] - flatten/filter/append child entries
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `x: 50.0`
//! - Signals: `x: my_signal` (stays connected!)
//! - Getters: `x: Prop::getter(|| compute_x())`
//!
//! Pass the signal itself, not its current value:
//!
//! ```ignore
//! // CORRECT - signal stays connected
//! create_scene_node("sprite", NodeProps::new().x(x_signal.clone()));
//!
//! // WRONG - reads once, breaks reactivity
//! create_scene_node("sprite", NodeProps::new().x(x_signal.get()));
//! ```

mod bind;
mod children;
mod element;
mod events;
mod texture;
mod types;

pub use bind::{bind_accessor, bind_prop};
pub use children::{append_children, flatten_children};
pub use element::{create_intrinsic, create_scene_node};
pub use events::{bind_events, normalize_event_name, resolve_event_mode};
pub use texture::{bind_texture, request_texture, TEXTURE_ERROR_EVENT, TEXTURE_LOAD_EVENT};
pub use types::*;
