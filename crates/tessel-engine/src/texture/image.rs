use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageResult, RgbaImage};

/// Decoded RGBA8 pixels plus an optional mip chain.
///
/// Rows are stored bottom-up (the decoded image is flipped vertically) so
/// that texture coordinate `v = 0` addresses the bottom edge of the picture.
#[derive(Debug, Clone)]
pub struct TextureImage {
    levels: Vec<RgbaImage>,
}

impl TextureImage {
    /// Wraps already-oriented pixels as a single-level image.
    pub fn from_rgba8(base: RgbaImage) -> Self {
        Self { levels: vec![base] }
    }

    /// Uniformly colored image, mostly for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_rgba8(RgbaImage::from_pixel(width.max(1), height.max(1), image::Rgba(rgba)))
    }

    /// Decodes any format the `image` crate recognises, flips it vertically
    /// and forces RGBA8.
    pub fn decode(bytes: &[u8]) -> ImageResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(decoded))
    }

    pub fn from_dynamic(img: DynamicImage) -> Self {
        Self::from_rgba8(img.flipv().to_rgba8())
    }

    /// Replaces any existing chain with successively halved levels down to 1x1.
    pub fn with_mipmaps(mut self) -> Self {
        self.levels.truncate(1);
        let (mut w, mut h) = self.levels[0].dimensions();
        while w > 1 || h > 1 {
            w = (w / 2).max(1);
            h = (h / 2).max(1);
            let prev = &self.levels[self.levels.len() - 1];
            let next = imageops::resize(prev, w, h, FilterType::Triangle);
            self.levels.push(next);
        }
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.levels[0].width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.levels[0].height()
    }

    #[inline]
    pub fn mip_level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level 0 is the full-resolution image.
    pub fn levels(&self) -> impl Iterator<Item = &RgbaImage> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_chain_reaches_one_pixel() {
        let img = TextureImage::solid(8, 2, [255, 0, 0, 255]).with_mipmaps();
        let dims: Vec<(u32, u32)> = img.levels().map(|l| l.dimensions()).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn solid_mips_keep_color() {
        let img = TextureImage::solid(4, 4, [10, 20, 30, 255]).with_mipmaps();
        for level in img.levels() {
            assert!(level.pixels().all(|p| p.0 == [10, 20, 30, 255]));
        }
    }

    #[test]
    fn single_pixel_has_one_level() {
        assert_eq!(TextureImage::solid(1, 1, [0; 4]).with_mipmaps().mip_level_count(), 1);
    }

    #[test]
    fn decode_flips_rows() {
        let mut src = RgbaImage::new(1, 2);
        src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        src.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(src)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let img = TextureImage::decode(&png).unwrap();
        let base = img.levels().next().unwrap();
        assert_eq!(base.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(base.get_pixel(0, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(TextureImage::decode(b"not an image").is_err());
    }
}
