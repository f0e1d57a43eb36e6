//! Image-file loading.

use std::path::Path;
use std::rc::Rc;

use crate::render::GraphicsBackend;

use super::{Texture, TextureError, TextureImage, TexturePreset};

/// Reads and decodes `path`, then creates a shareable texture.
///
/// `preset = None` selects [`TexturePreset::default_params`].
pub fn load_texture<B: GraphicsBackend>(
    backend: &mut B,
    path: impl AsRef<Path>,
    preset: Option<TexturePreset>,
) -> Result<Rc<Texture<B>>, TextureError> {
    let path = path.as_ref();
    let image = decode_file(path)?;
    log::info!("image: {} {}x{}", path.display(), image.width(), image.height());

    let params = preset.map_or_else(TexturePreset::default_params, TexturePreset::params);
    let texture = Texture::new(backend, &image, params)?;
    Ok(Rc::new(texture))
}

/// Reads and decodes `path` without touching the backend.
pub fn decode_file(path: &Path) -> Result<TextureImage, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    TextureImage::decode(&bytes).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    #[test]
    fn missing_file_is_io_error() {
        let mut b = HeadlessBackend::new();
        let err = load_texture(&mut b, "/definitely/not/here.png", None).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
        assert!(b.commands().is_empty());
    }
}
