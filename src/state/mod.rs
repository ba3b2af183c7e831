//! State Module - Runtime configuration
//!
//! - **Assets** - texture loader and spawner used by sprite `texture` props

pub mod assets;

pub use assets::{
    has_texture_loader, reset_assets, set_spawner, set_texture_loader, set_texture_loader_fn,
    TextureLoader,
};
