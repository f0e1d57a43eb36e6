/// Texel filter for magnification and for the base minification lookup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// How the sampler blends between mip levels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MipmapMode {
    /// Level 0 only.
    None,
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WrapMode {
    ClampToEdge,
    ClampToBorder,
    Repeat,
}

/// Sampling parameters, fixed when the texture is created.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureParams {
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub mipmap: MipmapMode,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
}

impl Default for TextureParams {
    /// GL's initial sampler state: `NEAREST_MIPMAP_LINEAR` / `LINEAR`,
    /// repeat on both axes.
    fn default() -> Self {
        Self {
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Linear,
            mipmap: MipmapMode::Linear,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
        }
    }
}

impl TextureParams {
    #[inline]
    pub fn uses_mipmaps(&self) -> bool {
        self.mipmap != MipmapMode::None
    }

    #[inline]
    pub fn uses_border(&self) -> bool {
        self.wrap_s == WrapMode::ClampToBorder || self.wrap_t == WrapMode::ClampToBorder
    }

    fn filtered(min_filter: FilterMode, mipmap: MipmapMode, mag_filter: FilterMode) -> Self {
        Self { min_filter, mag_filter, mipmap, ..Self::default() }
    }

    fn wrapped(wrap_s: WrapMode, wrap_t: WrapMode) -> Self {
        Self { wrap_s, wrap_t, ..Self::default() }
    }
}

/// The thirteen filter/wrap combinations the viewer's catalog compares.
///
/// Presets 0..=6 vary only the filters, 7..=12 only the wrap modes; the
/// untouched half keeps the sampler defaults.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TexturePreset {
    NearestNoMipmap,
    LinearNoMipmap,
    NearestMipmapLinear,
    LinearMipmapLinear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    LinearMipmapLinearMagNearest,
    ClampEdge,
    ClampBorder,
    EdgeSBorderT,
    BorderSEdgeT,
    EdgeSRepeatT,
    /// Same sampler state as [`TexturePreset::EdgeSBorderT`]; kept as its own
    /// index so catalogs keyed by number stay stable.
    EdgeSBorderTAlt,
}

impl TexturePreset {
    pub const ALL: [TexturePreset; 13] = [
        TexturePreset::NearestNoMipmap,
        TexturePreset::LinearNoMipmap,
        TexturePreset::NearestMipmapLinear,
        TexturePreset::LinearMipmapLinear,
        TexturePreset::NearestMipmapNearest,
        TexturePreset::LinearMipmapNearest,
        TexturePreset::LinearMipmapLinearMagNearest,
        TexturePreset::ClampEdge,
        TexturePreset::ClampBorder,
        TexturePreset::EdgeSBorderT,
        TexturePreset::BorderSEdgeT,
        TexturePreset::EdgeSRepeatT,
        TexturePreset::EdgeSBorderTAlt,
    ];

    pub fn from_index(index: i32) -> Result<Self, super::TextureError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(super::TextureError::InvalidPreset(index))
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&p| p == self).unwrap_or_default()
    }

    pub fn params(self) -> TextureParams {
        use FilterMode::{Linear, Nearest};
        use WrapMode::{ClampToBorder, ClampToEdge, Repeat};

        match self {
            TexturePreset::NearestNoMipmap => TextureParams::filtered(Nearest, MipmapMode::None, Linear),
            TexturePreset::LinearNoMipmap => TextureParams::filtered(Linear, MipmapMode::None, Linear),
            TexturePreset::NearestMipmapLinear => TextureParams::filtered(Nearest, MipmapMode::Linear, Linear),
            TexturePreset::LinearMipmapLinear => TextureParams::filtered(Linear, MipmapMode::Linear, Linear),
            TexturePreset::NearestMipmapNearest => TextureParams::filtered(Nearest, MipmapMode::Nearest, Linear),
            TexturePreset::LinearMipmapNearest => TextureParams::filtered(Linear, MipmapMode::Nearest, Linear),
            TexturePreset::LinearMipmapLinearMagNearest => {
                TextureParams::filtered(Linear, MipmapMode::Linear, Nearest)
            }
            TexturePreset::ClampEdge => TextureParams::wrapped(ClampToEdge, ClampToEdge),
            TexturePreset::ClampBorder => TextureParams::wrapped(ClampToBorder, ClampToBorder),
            TexturePreset::EdgeSBorderT | TexturePreset::EdgeSBorderTAlt => {
                TextureParams::wrapped(ClampToEdge, ClampToBorder)
            }
            TexturePreset::BorderSEdgeT => TextureParams::wrapped(ClampToBorder, ClampToEdge),
            TexturePreset::EdgeSRepeatT => TextureParams::wrapped(ClampToEdge, Repeat),
        }
    }

    /// Parameters used when no preset is selected.
    pub fn default_params() -> TextureParams {
        TextureParams::wrapped(WrapMode::ClampToEdge, WrapMode::ClampToBorder)
    }

    pub fn label(self) -> &'static str {
        match self {
            TexturePreset::NearestNoMipmap => "min nearest, mag linear",
            TexturePreset::LinearNoMipmap => "min linear, mag linear",
            TexturePreset::NearestMipmapLinear => "min nearest/mipmap linear",
            TexturePreset::LinearMipmapLinear => "min linear/mipmap linear",
            TexturePreset::NearestMipmapNearest => "min nearest/mipmap nearest",
            TexturePreset::LinearMipmapNearest => "min linear/mipmap nearest",
            TexturePreset::LinearMipmapLinearMagNearest => "min linear/mipmap linear, mag nearest",
            TexturePreset::ClampEdge => "wrap edge/edge",
            TexturePreset::ClampBorder => "wrap border/border",
            TexturePreset::EdgeSBorderT | TexturePreset::EdgeSBorderTAlt => "wrap edge/border",
            TexturePreset::BorderSEdgeT => "wrap border/edge",
            TexturePreset::EdgeSRepeatT => "wrap edge/repeat",
        }
    }
}
