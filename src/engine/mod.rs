//! Engine - intrinsic registry and reactive scopes.
//!
//! - Intrinsic: the closed tag set and its node constructors
//! - Scope: `spark_signals` effect scopes plus node adoption
//!
//! # Ownership
//!
//! ```text
//! Scope ─┬─ effects (bindings, draw, texture sources)    stopped first
//!        ├─ cleanups (listener removals, child scopes)   run next
//!        └─ adopted nodes                                destroyed as cleanups
//! ```

mod intrinsic;
mod scope;

pub use intrinsic::*;
pub use scope::*;
