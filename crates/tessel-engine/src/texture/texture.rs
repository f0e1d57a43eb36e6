use crate::error::ResourceError;
use crate::render::{GraphicsBackend, check_graphics_state};

use super::{TextureImage, TextureParams};

/// Texture target. Only 2-D images are created today.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureKind {
    D2,
    CubeMap,
}

/// GPU image with fixed sampling parameters.
///
/// Shared between shapes through `Rc<Texture<B>>`; the backend handle is
/// released when the last owner drops.
pub struct Texture<B: GraphicsBackend> {
    handle: B::Texture,
    width: u32,
    height: u32,
    kind: TextureKind,
    params: TextureParams,
}

impl<B: GraphicsBackend> Texture<B> {
    /// Uploads `image` (with its mip chain, if any) under `params`.
    pub fn new(backend: &mut B, image: &TextureImage, params: TextureParams) -> Result<Self, ResourceError> {
        let chained;
        let image = if params.uses_mipmaps() && image.mip_level_count() == 1 {
            chained = image.clone().with_mipmaps();
            &chained
        } else {
            image
        };

        let handle = backend.create_texture(image, &params)?;
        check_graphics_state(backend, "texture creation");

        log::debug!(
            "texture: {}x{} ({} mip levels) {:?}",
            image.width(),
            image.height(),
            image.mip_level_count(),
            params
        );

        Ok(Self {
            handle,
            width: image.width(),
            height: image.height(),
            kind: TextureKind::D2,
            params,
        })
    }

    pub fn bind(&self, backend: &mut B) {
        backend.bind_texture(&self.handle);
    }

    pub fn unbind(&self, backend: &mut B) {
        backend.unbind_texture();
    }

    pub fn handle(&self) -> &B::Texture {
        &self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    pub fn params(&self) -> &TextureParams {
        &self.params
    }
}

impl<B: GraphicsBackend> std::fmt::Debug for Texture<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Command, HeadlessBackend};
    use crate::texture::TexturePreset;

    #[test]
    fn mipmapped_params_generate_chain() {
        let mut b = HeadlessBackend::new();
        let img = TextureImage::solid(16, 16, [0, 0, 0, 255]);
        let tex = Texture::new(&mut b, &img, TexturePreset::LinearMipmapLinear.params()).unwrap();
        assert_eq!((tex.width(), tex.height()), (16, 16));
        assert!(matches!(
            b.commands()[0],
            Command::CreateTexture { mip_levels: 5, .. }
        ));
    }

    #[test]
    fn no_mipmap_params_upload_one_level() {
        let mut b = HeadlessBackend::new();
        let img = TextureImage::solid(16, 16, [0, 0, 0, 255]);
        Texture::new(&mut b, &img, TexturePreset::NearestNoMipmap.params()).unwrap();
        assert!(matches!(b.commands()[0], Command::CreateTexture { mip_levels: 1, .. }));
    }

    #[test]
    fn bind_and_unbind_go_through_backend() {
        let mut b = HeadlessBackend::new();
        let tex = Texture::new(&mut b, &TextureImage::solid(2, 2, [0; 4]), Default::default()).unwrap();
        tex.bind(&mut b);
        assert!(b.bound_texture().is_some());
        tex.unbind(&mut b);
        assert!(b.bound_texture().is_none());
    }

    #[test]
    fn creation_failure_is_recoverable() {
        let mut b = HeadlessBackend::new();
        b.set_fail_resources(true);
        let err = Texture::new(&mut b, &TextureImage::solid(2, 2, [0; 4]), Default::default()).unwrap_err();
        assert!(matches!(err, ResourceError::TextureCreation { width: 2, height: 2, .. }));
    }

    #[test]
    fn drop_releases_handle() {
        let mut b = HeadlessBackend::new();
        let tex = Texture::new(&mut b, &TextureImage::solid(2, 2, [0; 4]), Default::default()).unwrap();
        drop(tex);
        assert!(matches!(b.commands().last(), Some(Command::ReleaseTexture { .. })));
    }
}
