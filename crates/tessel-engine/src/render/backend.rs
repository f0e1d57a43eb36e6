use crate::error::ResourceError;
use crate::texture::{TextureImage, TextureParams};

/// Vertex attribute streams understood by the shape shader.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    TexCoord,
}

impl VertexAttribute {
    pub const ALL: [VertexAttribute; 3] = [
        VertexAttribute::Position,
        VertexAttribute::Normal,
        VertexAttribute::TexCoord,
    ];

    /// Shader input name.
    pub fn name(self) -> &'static str {
        match self {
            VertexAttribute::Position => "vPosition",
            VertexAttribute::Normal => "vNormal",
            VertexAttribute::TexCoord => "vTexCoord",
        }
    }

    /// Shader input location.
    pub fn location(self) -> u32 {
        match self {
            VertexAttribute::Position => 0,
            VertexAttribute::Normal => 1,
            VertexAttribute::TexCoord => 2,
        }
    }
}

/// Uniforms of the shape program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    /// `projection * view * sceneRotation`, written once per scene redraw.
    ViewProjection,
    /// Per-shape `translate * scale`.
    Model,
    Color,
    TextureWeight,
    HasTexture,
}

impl UniformSlot {
    pub fn name(self) -> &'static str {
        match self {
            UniformSlot::ViewProjection => "uPVS",
            UniformSlot::Model => "uModel",
            UniformSlot::Color => "uColor",
            UniformSlot::TextureWeight => "uTexWt",
            UniformSlot::HasTexture => "uHasTexture",
        }
    }
}

/// Value written to a [`UniformSlot`]. Matrices are column-major.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Mat4([f32; 16]),
    Vec4([f32; 4]),
    Float(f32),
    Int(i32),
}

/// Buffers fed to one draw call. Missing streams fall back to the attribute
/// default `(0, 0, 0, 1)`.
pub struct VertexArray<'a, Buf> {
    pub positions: &'a Buf,
    pub normals: Option<&'a Buf>,
    pub tex_coords: Option<&'a Buf>,
}

/// Explicit render context passed to shapes, textures and scenes.
///
/// Resource handles are owned values: dropping a `Buffer` or `Texture`
/// releases the GPU object.
pub trait GraphicsBackend {
    type Buffer;
    type Texture;

    fn create_vertex_buffer(&mut self, attribute: VertexAttribute) -> Result<Self::Buffer, ResourceError>;

    /// Replaces the contents of `buffer` with `data` laid out as
    /// `tuple_size` components per vertex.
    fn upload_vertex_buffer(&mut self, buffer: &mut Self::Buffer, data: &[f32], tuple_size: usize);

    fn create_texture(
        &mut self,
        image: &TextureImage,
        params: &TextureParams,
    ) -> Result<Self::Texture, ResourceError>;

    fn set_uniform(&mut self, slot: UniformSlot, value: UniformValue);

    fn bind_texture(&mut self, texture: &Self::Texture);

    fn unbind_texture(&mut self);

    /// Unindexed triangle list of `vertex_count` vertices.
    fn draw_triangles(&mut self, vertices: VertexArray<'_, Self::Buffer>, vertex_count: u32);

    /// Drains the oldest pending graphics-state error, if any.
    fn take_error(&mut self) -> Option<String>;
}
