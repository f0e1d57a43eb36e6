use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::ResourceError;
use crate::texture::{TextureImage, TextureParams};

use super::{GraphicsBackend, UniformSlot, UniformValue, VertexArray, VertexAttribute};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateBuffer {
        id: BufferId,
        attribute: VertexAttribute,
    },
    UploadBuffer {
        id: BufferId,
        tuple_size: usize,
        len: usize,
    },
    ReleaseBuffer {
        id: BufferId,
    },
    CreateTexture {
        id: TextureId,
        width: u32,
        height: u32,
        mip_levels: usize,
        params: TextureParams,
    },
    ReleaseTexture {
        id: TextureId,
    },
    SetUniform {
        slot: UniformSlot,
        value: UniformValue,
    },
    BindTexture {
        id: TextureId,
    },
    UnbindTexture,
    Draw {
        positions: BufferId,
        normals: Option<BufferId>,
        tex_coords: Option<BufferId>,
        vertex_count: u32,
    },
}

type CommandLog = Rc<RefCell<Vec<Command>>>;

/// CPU-side stand-in for a vertex buffer.
#[derive(Debug)]
pub struct HeadlessBuffer {
    id: BufferId,
    attribute: VertexAttribute,
    data: Vec<f32>,
    tuple_size: usize,
    log: CommandLog,
}

impl HeadlessBuffer {
    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn attribute(&self) -> VertexAttribute {
        self.attribute
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    fn vertex_count(&self) -> usize {
        if self.tuple_size == 0 { 0 } else { self.data.len() / self.tuple_size }
    }
}

impl Drop for HeadlessBuffer {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Command::ReleaseBuffer { id: self.id });
    }
}

#[derive(Debug)]
pub struct HeadlessTexture {
    id: TextureId,
    width: u32,
    height: u32,
    params: TextureParams,
    log: CommandLog,
}

impl HeadlessTexture {
    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn params(&self) -> &TextureParams {
        &self.params
    }
}

impl Drop for HeadlessTexture {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Command::ReleaseTexture { id: self.id });
    }
}

/// Backend that records every call instead of talking to a GPU.
///
/// Mirrors the GL error model loosely: malformed uploads and draws that read
/// past the end of a buffer queue an error for [`GraphicsBackend::take_error`]
/// instead of failing the call.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    log: CommandLog,
    next_buffer: u32,
    next_texture: u32,
    uniforms: HashMap<UniformSlot, UniformValue>,
    bound_texture: Option<TextureId>,
    errors: VecDeque<String>,
    fail_resources: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every command recorded so far.
    pub fn commands(&self) -> Vec<Command> {
        self.log.borrow().clone()
    }

    /// Returns the recorded commands and starts a fresh log.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn draw_calls(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. }))
            .count()
    }

    /// Every uniform write in recording order.
    pub fn uniform_writes(&self) -> Vec<(UniformSlot, UniformValue)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Command::SetUniform { slot, value } => Some((*slot, *value)),
                _ => None,
            })
            .collect()
    }

    /// Current value of a uniform, as the next draw would see it.
    pub fn uniform(&self, slot: UniformSlot) -> Option<UniformValue> {
        self.uniforms.get(&slot).copied()
    }

    pub fn bound_texture(&self) -> Option<TextureId> {
        self.bound_texture
    }

    /// Queues an error for the next diagnostics check.
    pub fn push_error(&mut self, msg: impl Into<String>) {
        self.errors.push_back(msg.into());
    }

    /// When set, buffer and texture creation fail with [`ResourceError`].
    pub fn set_fail_resources(&mut self, fail: bool) {
        self.fail_resources = fail;
    }

    fn record(&self, cmd: Command) {
        self.log.borrow_mut().push(cmd);
    }
}

impl GraphicsBackend for HeadlessBackend {
    type Buffer = HeadlessBuffer;
    type Texture = HeadlessTexture;

    fn create_vertex_buffer(&mut self, attribute: VertexAttribute) -> Result<HeadlessBuffer, ResourceError> {
        if self.fail_resources {
            return Err(ResourceError::BufferCreation {
                attribute: attribute.name(),
                reason: "resource creation disabled".into(),
            });
        }

        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        self.record(Command::CreateBuffer { id, attribute });

        Ok(HeadlessBuffer {
            id,
            attribute,
            data: Vec::new(),
            tuple_size: 0,
            log: Rc::clone(&self.log),
        })
    }

    fn upload_vertex_buffer(&mut self, buffer: &mut HeadlessBuffer, data: &[f32], tuple_size: usize) {
        if tuple_size == 0 || tuple_size > 4 || data.len() % tuple_size != 0 {
            self.push_error(format!(
                "invalid upload to buffer {}: {} floats with tuple size {}",
                buffer.id.0,
                data.len(),
                tuple_size
            ));
            return;
        }

        buffer.data.clear();
        buffer.data.extend_from_slice(data);
        buffer.tuple_size = tuple_size;
        self.record(Command::UploadBuffer {
            id: buffer.id,
            tuple_size,
            len: data.len(),
        });
    }

    fn create_texture(
        &mut self,
        image: &TextureImage,
        params: &TextureParams,
    ) -> Result<HeadlessTexture, ResourceError> {
        if self.fail_resources {
            return Err(ResourceError::TextureCreation {
                width: image.width(),
                height: image.height(),
                reason: "resource creation disabled".into(),
            });
        }

        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.record(Command::CreateTexture {
            id,
            width: image.width(),
            height: image.height(),
            mip_levels: image.mip_level_count(),
            params: *params,
        });

        Ok(HeadlessTexture {
            id,
            width: image.width(),
            height: image.height(),
            params: *params,
            log: Rc::clone(&self.log),
        })
    }

    fn set_uniform(&mut self, slot: UniformSlot, value: UniformValue) {
        self.uniforms.insert(slot, value);
        self.record(Command::SetUniform { slot, value });
    }

    fn bind_texture(&mut self, texture: &HeadlessTexture) {
        self.bound_texture = Some(texture.id);
        self.record(Command::BindTexture { id: texture.id });
    }

    fn unbind_texture(&mut self) {
        self.bound_texture = None;
        self.record(Command::UnbindTexture);
    }

    fn draw_triangles(&mut self, vertices: VertexArray<'_, HeadlessBuffer>, vertex_count: u32) {
        let available = vertices.positions.vertex_count();
        if vertex_count as usize > available {
            self.push_error(format!(
                "draw of {vertex_count} vertices exceeds position buffer ({available})"
            ));
        }
        if vertex_count % 3 != 0 {
            log::debug!("headless: draw of {vertex_count} vertices leaves a partial triangle");
        }

        self.record(Command::Draw {
            positions: vertices.positions.id,
            normals: vertices.normals.map(|b| b.id),
            tex_coords: vertices.tex_coords.map(|b| b.id),
            vertex_count,
        });
    }

    fn take_error(&mut self) -> Option<String> {
        self.errors.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── buffers ───────────────────────────────────────────────────────────

    #[test]
    fn buffer_ids_are_sequential() {
        let mut b = HeadlessBackend::new();
        let a = b.create_vertex_buffer(VertexAttribute::Position).unwrap();
        let c = b.create_vertex_buffer(VertexAttribute::Normal).unwrap();
        assert_eq!(a.id(), BufferId(0));
        assert_eq!(c.id(), BufferId(1));
    }

    #[test]
    fn dropping_a_buffer_records_release() {
        let mut b = HeadlessBackend::new();
        let buf = b.create_vertex_buffer(VertexAttribute::Position).unwrap();
        drop(buf);
        assert_eq!(b.commands().last(), Some(&Command::ReleaseBuffer { id: BufferId(0) }));
    }

    #[test]
    fn ragged_upload_queues_error_and_keeps_data() {
        let mut b = HeadlessBackend::new();
        let mut buf = b.create_vertex_buffer(VertexAttribute::Position).unwrap();
        b.upload_vertex_buffer(&mut buf, &[1.0, 2.0, 3.0], 3);
        b.upload_vertex_buffer(&mut buf, &[1.0, 2.0], 3);
        assert_eq!(buf.data(), &[1.0, 2.0, 3.0]);
        assert!(b.take_error().is_some());
        assert!(b.take_error().is_none());
    }

    #[test]
    fn failing_backend_refuses_buffers() {
        let mut b = HeadlessBackend::new();
        b.set_fail_resources(true);
        assert!(matches!(
            b.create_vertex_buffer(VertexAttribute::Normal),
            Err(ResourceError::BufferCreation { attribute: "vNormal", .. })
        ));
    }

    // ── draws ─────────────────────────────────────────────────────────────

    #[test]
    fn overlong_draw_queues_error() {
        let mut b = HeadlessBackend::new();
        let mut buf = b.create_vertex_buffer(VertexAttribute::Position).unwrap();
        b.upload_vertex_buffer(&mut buf, &[0.0; 9], 3);
        let va = VertexArray { positions: &buf, normals: None, tex_coords: None };
        b.draw_triangles(va, 6);
        assert_eq!(b.draw_calls(), 1);
        assert!(b.take_error().is_some());
    }

    #[test]
    fn uniform_tracks_latest_write() {
        let mut b = HeadlessBackend::new();
        b.set_uniform(UniformSlot::TextureWeight, UniformValue::Float(0.2));
        b.set_uniform(UniformSlot::TextureWeight, UniformValue::Float(0.7));
        assert_eq!(b.uniform(UniformSlot::TextureWeight), Some(UniformValue::Float(0.7)));
        assert_eq!(b.uniform_writes().len(), 2);
    }
}
