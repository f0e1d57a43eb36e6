//! wgpu implementation of [`GraphicsBackend`].
//!
//! Shapes and scenes talk in GL terms: uniforms are set one at a time and
//! persist until overwritten, a texture stays bound until unbound, and draws
//! happen immediately. wgpu wants a pipeline, bind groups and a render pass.
//! The backend bridges the two by recording:
//!
//! - `set_uniform` updates a CPU copy of the uniform block
//! - `draw_triangles` snapshots that block plus the bound texture and streams
//! - [`GpuBackend::encode`] writes every snapshot into one dynamic-offset
//!   uniform buffer and replays the draws in a single render pass
//!
//! Vertex data is uploaded immediately through the queue. Re-uploading a
//! buffer that an already-recorded draw of the same frame reads is therefore
//! visible to that draw; shapes upload before they draw, so this never
//! happens in practice.

mod pipeline;
mod resources;
mod uniforms;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ResourceError;
use crate::texture::{TextureImage, TextureParams};

use super::{GraphicsBackend, RenderCtx, RenderTarget, UniformSlot, UniformValue, VertexArray, VertexAttribute};

use pipeline::PipelineKey;
use resources::{VEC4_STRIDE, sampler_descriptor, upload_texture, widen_to_vec4};
use uniforms::{ShapeUniforms, aligned_stride};

pub use pipeline::PolygonMode;
pub use resources::{GpuBuffer, GpuTexture};

/// Optional device features the backend makes use of when present.
pub const OPTIONAL_FEATURES: wgpu::Features =
    wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER.union(wgpu::Features::POLYGON_MODE_LINE);

/// Construction parameters for [`GpuBackend`].
#[derive(Debug, Clone, Default)]
pub struct GpuBackendInit {
    pub polygon_mode: PolygonMode,
}

type ErrorSink = Arc<Mutex<VecDeque<String>>>;

/// One recorded draw.
struct DrawRecord {
    uniforms: ShapeUniforms,
    texture: Option<wgpu::BindGroup>,
    positions: wgpu::Buffer,
    normals: Option<wgpu::Buffer>,
    tex_coords: Option<wgpu::Buffer>,
    vertex_count: u32,
}

pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    features: wgpu::Features,

    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,

    // pipeline (rebuilt when target formats or polygon mode change)
    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    polygon_mode: PolygonMode,

    // per-frame uniform storage
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,
    uniform_stride: u64,

    // stand-ins for missing streams / untextured draws
    fallback_stream: Option<wgpu::Buffer>,
    fallback_capacity: u32,
    fallback_texture: GpuTexture,

    // recorded GL-style state
    current: ShapeUniforms,
    bound_texture: Option<wgpu::BindGroup>,
    draws: Vec<DrawRecord>,

    errors: ErrorSink,
    warned_border: bool,
}

impl GpuBackend {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, init: GpuBackendInit) -> Result<Self, ResourceError> {
        let errors: ErrorSink = Arc::default();
        let sink = Arc::clone(&errors);
        device.on_uncaptured_error(Arc::new(move |e: wgpu::Error| {
            log::error!("wgpu uncaptured error: {e}");
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(e.to_string());
        }));

        let uniform_layout = pipeline::uniform_layout(device);
        let texture_layout = pipeline::texture_layout(device);

        let white = TextureImage::solid(1, 1, [255, 255, 255, 255]);
        let fallback_texture = upload_texture(
            device,
            queue,
            &texture_layout,
            &white,
            &sampler_descriptor(&TextureParams::default(), false),
        )?;

        let features = device.features();
        log::info!("gpu backend: optional features {:?}", features & OPTIONAL_FEATURES);

        let uniform_stride = aligned_stride(
            ShapeUniforms::SIZE,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );

        let mut backend = Self {
            device: device.clone(),
            queue: queue.clone(),
            features,
            uniform_layout,
            texture_layout,
            pipeline_key: None,
            pipeline: None,
            polygon_mode: PolygonMode::Fill,
            uniform_buffer: None,
            uniform_bind_group: None,
            uniform_capacity: 0,
            uniform_stride,
            fallback_stream: None,
            fallback_capacity: 0,
            fallback_texture,
            current: ShapeUniforms::default(),
            bound_texture: None,
            draws: Vec::new(),
            errors,
            warned_border: false,
        };
        backend.set_polygon_mode(init.polygon_mode);
        Ok(backend)
    }

    pub fn features(&self) -> wgpu::Features {
        self.features
    }

    pub fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode
    }

    /// Switches between filled and wireframe rasterization.
    ///
    /// Returns `false` (and stays in fill mode) when the device lacks
    /// `POLYGON_MODE_LINE`.
    pub fn set_polygon_mode(&mut self, mode: PolygonMode) -> bool {
        if mode == PolygonMode::Line && !self.features.contains(wgpu::Features::POLYGON_MODE_LINE) {
            log::warn!("gpu backend: line polygon mode not supported by this device");
            return false;
        }
        self.polygon_mode = mode;
        true
    }

    /// Number of draws recorded since the last [`GpuBackend::encode`].
    pub fn pending_draws(&self) -> usize {
        self.draws.len()
    }

    /// Drops draws recorded for a frame that was never encoded, e.g. when
    /// surface acquisition failed. Returns how many were dropped.
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.draws.len();
        if dropped > 0 {
            log::debug!("gpu backend: discarding {dropped} unpresented draws");
            self.draws.clear();
        }
        dropped
    }

    /// Replays the recorded draws into one render pass on `target`.
    ///
    /// Color and depth are loaded, not cleared; the frame clear happens
    /// before this call.
    pub fn encode(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.draws.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_uniform_capacity(self.draws.len());
        let max_vertices = self.draws.iter().map(|d| d.vertex_count).max().unwrap_or(0);
        self.ensure_fallback_stream(max_vertices);

        let Some(uniform_buffer) = self.uniform_buffer.as_ref() else { return; };
        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; stride * self.draws.len()];
        for (i, draw) in self.draws.iter().enumerate() {
            let at = i * stride;
            bytes[at..at + ShapeUniforms::SIZE as usize].copy_from_slice(bytemuck::bytes_of(&draw.uniforms));
        }
        ctx.queue.write_buffer(uniform_buffer, 0, &bytes);

        let Some(pipeline)       = self.pipeline.as_ref()           else { return; };
        let Some(uniform_group)  = self.uniform_bind_group.as_ref() else { return; };
        let Some(fallback)       = self.fallback_stream.as_ref()    else { return; };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessel shape pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        for (i, draw) in self.draws.iter().enumerate() {
            let offset = (i as u64 * self.uniform_stride) as u32;
            rpass.set_bind_group(0, uniform_group, &[offset]);
            rpass.set_bind_group(1, draw.texture.as_ref().unwrap_or(&self.fallback_texture.bind_group), &[]);
            rpass.set_vertex_buffer(0, draw.positions.slice(..));
            rpass.set_vertex_buffer(1, draw.normals.as_ref().unwrap_or(fallback).slice(..));
            rpass.set_vertex_buffer(2, draw.tex_coords.as_ref().unwrap_or(fallback).slice(..));
            rpass.draw(0..draw.vertex_count, 0..1);
        }
        drop(rpass);

        log::debug!("gpu backend: replayed {} draws", self.draws.len());
        self.draws.clear();
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let key = PipelineKey {
            color: ctx.surface_format,
            depth: ctx.depth_format,
            polygon: self.polygon_mode,
        };
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        self.pipeline = Some(pipeline::create_pipeline(
            &self.device,
            key,
            &self.uniform_layout,
            &self.texture_layout,
        ));
        self.pipeline_key = Some(key);
        log::debug!("gpu backend: built pipeline {key:?}");
    }

    fn ensure_uniform_capacity(&mut self, required: usize) {
        if required <= self.uniform_capacity && self.uniform_buffer.is_some() {
            return;
        }

        let capacity = required.next_power_of_two().max(64);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessel shape uniforms"),
            size: capacity as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel shape uniforms bind group"),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(ShapeUniforms::SIZE),
                }),
            }],
        });

        self.uniform_buffer = Some(buffer);
        self.uniform_bind_group = Some(bind_group);
        self.uniform_capacity = capacity;
    }

    /// Grows the shared `(0, 0, 0, 1)` stream bound in place of missing
    /// normals or texture coordinates.
    fn ensure_fallback_stream(&mut self, vertices: u32) {
        let vertices = vertices.max(1);
        if vertices <= self.fallback_capacity && self.fallback_stream.is_some() {
            return;
        }

        let capacity = vertices.next_power_of_two();
        let data = vec![resources::ATTRIBUTE_DEFAULT; capacity as usize];
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessel fallback attribute stream"),
            size: u64::from(capacity) * VEC4_STRIDE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.queue.write_buffer(&buffer, 0, bytemuck::cast_slice(&data));

        self.fallback_stream = Some(buffer);
        self.fallback_capacity = capacity;
    }

    fn push_error(&self, msg: String) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(msg);
    }
}

impl GraphicsBackend for GpuBackend {
    type Buffer = GpuBuffer;
    type Texture = GpuTexture;

    fn create_vertex_buffer(&mut self, attribute: VertexAttribute) -> Result<GpuBuffer, ResourceError> {
        Ok(GpuBuffer::new(attribute))
    }

    fn upload_vertex_buffer(&mut self, buffer: &mut GpuBuffer, data: &[f32], tuple_size: usize) {
        if !(1..=4).contains(&tuple_size) || data.len() % tuple_size != 0 {
            self.push_error(format!(
                "invalid {} upload: {} floats with tuple size {}",
                buffer.attribute.name(),
                data.len(),
                tuple_size
            ));
            return;
        }

        let widened = widen_to_vec4(data, tuple_size);
        let size = widened.len() as u64 * VEC4_STRIDE;
        buffer.vertex_count = widened.len() as u32;
        if size == 0 {
            return;
        }

        if buffer.buffer.is_none() || buffer.capacity < size {
            buffer.buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(buffer.attribute.name()),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            buffer.capacity = size;
        }
        if let Some(vbo) = buffer.buffer.as_ref() {
            self.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&widened));
        }
    }

    fn create_texture(&mut self, image: &TextureImage, params: &TextureParams) -> Result<GpuTexture, ResourceError> {
        let border_supported = self.features.contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER);
        if params.uses_border() && !border_supported && !self.warned_border {
            log::warn!("gpu backend: clamp-to-border unsupported, using clamp-to-edge");
            self.warned_border = true;
        }

        upload_texture(
            &self.device,
            &self.queue,
            &self.texture_layout,
            image,
            &sampler_descriptor(params, border_supported),
        )
    }

    fn set_uniform(&mut self, slot: UniformSlot, value: UniformValue) {
        if !self.current.apply(slot, value) {
            self.push_error(format!("type mismatch writing {}: {value:?}", slot.name()));
        }
    }

    fn bind_texture(&mut self, texture: &GpuTexture) {
        self.bound_texture = Some(texture.bind_group.clone());
    }

    fn unbind_texture(&mut self) {
        self.bound_texture = None;
    }

    fn draw_triangles(&mut self, vertices: VertexArray<'_, GpuBuffer>, vertex_count: u32) {
        let Some(positions) = vertices.positions.buffer.clone() else {
            self.push_error("draw without uploaded positions".into());
            return;
        };
        if vertex_count > vertices.positions.vertex_count {
            self.push_error(format!(
                "draw of {vertex_count} vertices exceeds position buffer ({})",
                vertices.positions.vertex_count
            ));
            return;
        }

        self.draws.push(DrawRecord {
            uniforms: self.current,
            texture: self.bound_texture.clone(),
            positions,
            normals: vertices.normals.and_then(|b| b.buffer.clone()),
            tex_coords: vertices.tex_coords.and_then(|b| b.buffer.clone()),
            vertex_count,
        });
    }

    fn take_error(&mut self) -> Option<String> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}
