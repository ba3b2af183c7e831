//! Assets - texture loader and task spawner configuration.
//!
//! The host installs a [`TextureLoader`] (how a source becomes a texture)
//! and a `futures` [`LocalSpawn`] (where the load runs). Both are
//! thread-local, matching the single-threaded scene graph.
//!
//! # Example
//!
//! ```
//! use futures::executor::LocalPool;
//! use futures::future::{self, FutureExt};
//! use spark_canvas::scene::{Texture, TextureSource};
//! use spark_canvas::state::assets;
//!
//! let mut pool = LocalPool::new();
//! assets::set_spawner(pool.spawner());
//! assets::set_texture_loader_fn(|source: &TextureSource| {
//!     future::ready(Ok(Texture::new(source.clone(), 64, 64))).boxed_local()
//! });
//! ```

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::error::LoadError;
use crate::scene::{Texture, TextureSource};

// =============================================================================
// Loader
// =============================================================================

/// Resolves a texture source to a texture.
pub trait TextureLoader {
    fn load(&self, source: &TextureSource) -> LocalBoxFuture<'static, Result<Texture, LoadError>>;
}

impl<F> TextureLoader for F
where
    F: Fn(&TextureSource) -> LocalBoxFuture<'static, Result<Texture, LoadError>>,
{
    fn load(&self, source: &TextureSource) -> LocalBoxFuture<'static, Result<Texture, LoadError>> {
        self(source)
    }
}

// =============================================================================
// State
// =============================================================================

thread_local! {
    static LOADER: RefCell<Option<Rc<dyn TextureLoader>>> = RefCell::new(None);
    static SPAWNER: RefCell<Option<Rc<dyn LocalSpawn>>> = RefCell::new(None);
}

/// Install the texture loader for this thread.
pub fn set_texture_loader(loader: impl TextureLoader + 'static) {
    LOADER.with(|slot| *slot.borrow_mut() = Some(Rc::new(loader)));
}

/// Install a closure as the texture loader.
pub fn set_texture_loader_fn<F>(loader: F)
where
    F: Fn(&TextureSource) -> LocalBoxFuture<'static, Result<Texture, LoadError>> + 'static,
{
    set_texture_loader(loader);
}

/// Install the executor texture loads are spawned on.
pub fn set_spawner(spawner: impl LocalSpawn + 'static) {
    SPAWNER.with(|slot| *slot.borrow_mut() = Some(Rc::new(spawner)));
}

pub fn has_texture_loader() -> bool {
    LOADER.with(|slot| slot.borrow().is_some())
}

/// Remove the loader and spawner (for testing).
pub fn reset_assets() {
    LOADER.with(|slot| *slot.borrow_mut() = None);
    SPAWNER.with(|slot| *slot.borrow_mut() = None);
}

// =============================================================================
// Internal
// =============================================================================

/// Ask the configured loader for `source`.
pub(crate) fn load_texture(
    source: &TextureSource,
) -> Result<LocalBoxFuture<'static, Result<Texture, LoadError>>, LoadError> {
    // Clone out so the loader may reconfigure assets without a borrow clash.
    let loader = LOADER.with(|slot| slot.borrow().clone()).ok_or(LoadError::NoLoader)?;
    Ok(loader.load(source))
}

/// Run `task` on the configured spawner.
pub(crate) fn spawn(task: impl Future<Output = ()> + 'static) -> Result<(), LoadError> {
    let spawner = SPAWNER
        .with(|slot| slot.borrow().clone())
        .ok_or_else(|| LoadError::Spawn("no spawner configured".to_string()))?;
    spawner
        .spawn_local(task)
        .map_err(|err| LoadError::Spawn(err.to_string()))
}
