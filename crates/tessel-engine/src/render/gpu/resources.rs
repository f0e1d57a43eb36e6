use crate::error::ResourceError;
use crate::render::VertexAttribute;
use crate::texture::{FilterMode, MipmapMode, TextureImage, TextureParams, WrapMode};

/// GL's value for attribute components a stream does not supply.
pub(super) const ATTRIBUTE_DEFAULT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Byte stride of every widened vertex stream.
pub(super) const VEC4_STRIDE: u64 = std::mem::size_of::<[f32; 4]>() as u64;

// ── vertex buffers ────────────────────────────────────────────────────────

/// Vertex stream owned by a shape. The wgpu buffer is allocated on first
/// upload and grown as needed; dropping the handle frees it.
#[derive(Debug)]
pub struct GpuBuffer {
    pub(super) attribute: VertexAttribute,
    pub(super) buffer: Option<wgpu::Buffer>,
    pub(super) capacity: u64,
    pub(super) vertex_count: u32,
}

impl GpuBuffer {
    pub(super) fn new(attribute: VertexAttribute) -> Self {
        Self {
            attribute,
            buffer: None,
            capacity: 0,
            vertex_count: 0,
        }
    }

    pub fn attribute(&self) -> VertexAttribute {
        self.attribute
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

/// Expands `tuple_size`-component tuples to four components, filling the
/// missing ones from [`ATTRIBUTE_DEFAULT`].
pub(super) fn widen_to_vec4(data: &[f32], tuple_size: usize) -> Vec<[f32; 4]> {
    data.chunks_exact(tuple_size)
        .map(|t| {
            let mut v = ATTRIBUTE_DEFAULT;
            v[..t.len()].copy_from_slice(t);
            v
        })
        .collect()
}

// ── textures ──────────────────────────────────────────────────────────────

/// Uploaded texture with its sampler, ready to bind as group 1.
#[derive(Debug)]
pub struct GpuTexture {
    pub(super) texture: wgpu::Texture,
    pub(super) bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    pub fn mip_level_count(&self) -> u32 {
        self.texture.mip_level_count()
    }
}

pub(super) fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    image: &TextureImage,
    sampler: &wgpu::SamplerDescriptor<'_>,
) -> Result<GpuTexture, ResourceError> {
    let max = device.limits().max_texture_dimension_2d;
    if image.width() > max || image.height() > max {
        return Err(ResourceError::TextureCreation {
            width: image.width(),
            height: image.height(),
            reason: format!("exceeds device limit of {max}"),
        });
    }

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("tessel shape texture"),
        size: wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: image.mip_level_count() as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (level, pixels) in image.levels().enumerate() {
        let (w, h) = pixels.dimensions();
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: level as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(sampler);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("tessel texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    });

    Ok(GpuTexture { texture, bind_group })
}

// ── samplers ──────────────────────────────────────────────────────────────

fn address_mode(mode: WrapMode, border_supported: bool) -> wgpu::AddressMode {
    match mode {
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrapMode::ClampToBorder if border_supported => wgpu::AddressMode::ClampToBorder,
        WrapMode::ClampToBorder => wgpu::AddressMode::ClampToEdge,
    }
}

fn filter_mode(mode: FilterMode) -> wgpu::FilterMode {
    match mode {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    }
}

/// Maps sampling parameters onto a wgpu sampler.
///
/// Clamp-to-border needs `ADDRESS_MODE_CLAMP_TO_BORDER`; without it the axis
/// degrades to clamp-to-edge. The border color is GL's default, transparent
/// black.
pub(super) fn sampler_descriptor(params: &TextureParams, border_supported: bool) -> wgpu::SamplerDescriptor<'static> {
    let border = border_supported && params.uses_border();
    wgpu::SamplerDescriptor {
        label: Some("tessel texture sampler"),
        address_mode_u: address_mode(params.wrap_s, border_supported),
        address_mode_v: address_mode(params.wrap_t, border_supported),
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter_mode(params.mag_filter),
        min_filter: filter_mode(params.min_filter),
        mipmap_filter: match params.mipmap {
            MipmapMode::Linear => wgpu::MipmapFilterMode::Linear,
            MipmapMode::Nearest | MipmapMode::None => wgpu::MipmapFilterMode::Nearest,
        },
        lod_max_clamp: if params.uses_mipmaps() { 32.0 } else { 0.0 },
        border_color: border.then_some(wgpu::SamplerBorderColor::TransparentBlack),
        ..Default::default()
    }
}
