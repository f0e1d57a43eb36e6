//! Texture resources: sampling parameters, CPU-side images and the shared
//! GPU texture handle.

mod image;
pub mod loader;
mod params;
#[allow(clippy::module_inception)]
mod texture;

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ResourceError;

pub use self::image::TextureImage;
pub use loader::load_texture;
pub use params::{FilterMode, MipmapMode, TextureParams, TexturePreset, WrapMode};
pub use texture::{Texture, TextureKind};

/// Errors from loading an image file into a texture.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("texture preset index {0} is out of range (0..=12)")]
    InvalidPreset(i32),
}
