//! Reactive scopes - disposal ownership for bindings and nodes.
//!
//! A [`Scope`] wraps a `spark_signals` effect scope. Effects created while
//! it runs belong to it, and so do cleanups registered through
//! [`on_cleanup`] and nodes handed over with [`adopt_node`]. The runtime
//! keeps the active-scope stack; this module only adds node ownership and
//! an idempotent `dispose`.
//!
//! Stopping a scope stops its effects first, then runs its cleanups, so
//! bindings are gone before the nodes they write to are destroyed.
//!
//! # Example
//!
//! ```
//! use spark_canvas::engine::{create_root, on_cleanup};
//!
//! let scope = create_root(|scope| {
//!     on_cleanup(|| println!("disposed"));
//!     scope
//! });
//! scope.dispose();
//! ```

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{effect_scope, on_scope_dispose, EffectScope};

use crate::scene::SceneNode;

/// A cleanup callback, run at most once.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Scope
// =============================================================================

struct ScopeInner {
    effects: EffectScope,
    disposed: Cell<bool>,
}

/// Owner of effects, cleanups and nodes. Cloning shares the same scope.
#[derive(Clone)]
pub struct Scope {
    inner: Rc<ScopeInner>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                effects: effect_scope(true),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Create a scope that is disposed together with this one.
    pub fn child(&self) -> Scope {
        let child = Scope::new();
        let owned = child.clone();
        self.on_dispose(move || owned.dispose());
        child
    }

    /// Run `f` with this scope active.
    ///
    /// A disposed scope owns nothing new: `f` still runs, outside it.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let mut pending = Some(f);
        let mut output = None;
        if !self.is_disposed() {
            let _ = self.inner.effects.run(|| output = pending.take().map(|f| f()));
        }
        match (output, pending) {
            (Some(value), _) => value,
            (None, Some(f)) => f(),
            (None, None) => unreachable!("scope consumed its closure without a result"),
        }
    }

    /// Register a cleanup. Runs immediately if the scope is already disposed.
    pub fn on_dispose(&self, cleanup: impl FnOnce() + 'static) {
        if self.is_disposed() {
            cleanup();
            return;
        }
        self.run(|| on_scope_dispose(cleanup));
    }

    /// Take ownership of `node`; it is destroyed when the scope is disposed
    /// (immediately, if it already was).
    pub fn adopt(&self, node: &SceneNode) {
        let node = node.clone();
        self.on_dispose(move || node.destroy());
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Stop effects, run cleanups, destroy adopted nodes. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.effects.stop();
        tracing::debug!("scope disposed");
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// =============================================================================
// Ambient Registration
// =============================================================================

/// Register a cleanup with the active scope.
///
/// Outside any scope the runtime drops the cleanup without running it, and
/// whatever it would have released lives on.
pub fn on_cleanup(cleanup: impl FnOnce() + 'static) {
    on_scope_dispose(cleanup);
}

/// Hand `node` to the active scope, to be destroyed on its disposal.
pub fn adopt_node(node: &SceneNode) {
    let node = node.clone();
    on_scope_dispose(move || node.destroy());
}

/// Run `f` inside a fresh scope and hand that scope to `f`.
///
/// The caller decides when to dispose it.
pub fn create_root<R>(f: impl FnOnce(Scope) -> R) -> R {
    let scope = Scope::new();
    scope.run(|| f(scope.clone()))
}
