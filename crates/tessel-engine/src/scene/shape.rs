use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::error::EngineError;
use crate::geometry::{AttributeData, Geometry};
use crate::paint::Color;
use crate::render::{
    GraphicsBackend, UniformSlot, UniformValue, VertexArray, VertexAttribute, check_graphics_state,
};
use crate::texture::Texture;

/// Number of color slots per shape. Slot 0 is the nominal color.
pub const MAX_COLORS: usize = 20;

const COORD_TUPLES: [usize; 3] = [2, 3, 4];
const NORMAL_TUPLES: [usize; 2] = [3, 4];
const TEX_COORD_TUPLES: [usize; 3] = [1, 2, 3];

/// Vertex-buffer synchronisation state.
///
/// `Dirty -> Uploading -> Clean` during a redraw; only the data setters move a
/// shape back to `Dirty`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UploadState {
    Dirty,
    Uploading,
    Clean,
}

/// Geometry + transform + appearance of one drawable object.
pub struct Shape<B: GraphicsBackend> {
    coords: Option<AttributeData>,
    normals: Option<AttributeData>,
    tex_coords: Option<AttributeData>,

    coord_vbo: B::Buffer,
    normal_vbo: B::Buffer,
    tex_coord_vbo: B::Buffer,
    upload: UploadState,

    location: Vec3,
    size: Vec3,
    rotation_angle: f32,
    rotation_axis: Vec3,
    model: Mat4,

    colors: [Option<Color>; MAX_COLORS],
    texture: Option<Rc<Texture<B>>>,
    texture_weight: f32,
}

impl<B: GraphicsBackend> Shape<B> {
    /// Creates an empty shape: no geometry, red, untextured, unit size.
    pub fn new(backend: &mut B) -> Result<Self, EngineError> {
        let coord_vbo = backend.create_vertex_buffer(VertexAttribute::Position)?;
        let normal_vbo = backend.create_vertex_buffer(VertexAttribute::Normal)?;
        let tex_coord_vbo = backend.create_vertex_buffer(VertexAttribute::TexCoord)?;

        let mut colors = [None; MAX_COLORS];
        colors[0] = Some(Color::RED);

        Ok(Self {
            coords: None,
            normals: None,
            tex_coords: None,
            coord_vbo,
            normal_vbo,
            tex_coord_vbo,
            upload: UploadState::Dirty,
            location: Vec3::ZERO,
            size: Vec3::ONE,
            rotation_angle: 0.0,
            rotation_axis: Vec3::Z,
            model: Mat4::IDENTITY,
            colors,
            texture: None,
            texture_weight: 1.0,
        })
    }

    /// Creates a shape holding a generated primitive.
    pub fn with_geometry(backend: &mut B, geometry: Geometry) -> Result<Self, EngineError> {
        let mut shape = Self::new(backend)?;
        let Geometry { positions, normals, tex_coords } = geometry;
        shape.store_attribute(VertexAttribute::Position, Some(positions));
        shape.store_attribute(VertexAttribute::Normal, Some(normals));
        shape.store_attribute(VertexAttribute::TexCoord, Some(tex_coords));
        Ok(shape)
    }

    // ── geometry ───────────────────────────────────────────────────────────

    /// Replaces the position array. `None` clears it.
    pub fn set_coord_data(&mut self, data: Option<Vec<f32>>, tuple_size: usize) -> Result<(), EngineError> {
        self.set_attribute(VertexAttribute::Position, data, tuple_size)
    }

    pub fn set_normal_data(&mut self, data: Option<Vec<f32>>, tuple_size: usize) -> Result<(), EngineError> {
        self.set_attribute(VertexAttribute::Normal, data, tuple_size)
    }

    pub fn set_texture_coord_data(
        &mut self,
        data: Option<Vec<f32>>,
        tuple_size: usize,
    ) -> Result<(), EngineError> {
        self.set_attribute(VertexAttribute::TexCoord, data, tuple_size)
    }

    fn set_attribute(
        &mut self,
        attribute: VertexAttribute,
        data: Option<Vec<f32>>,
        tuple_size: usize,
    ) -> Result<(), EngineError> {
        let allowed: &[usize] = match attribute {
            VertexAttribute::Position => &COORD_TUPLES,
            VertexAttribute::Normal => &NORMAL_TUPLES,
            VertexAttribute::TexCoord => &TEX_COORD_TUPLES,
        };
        if !allowed.contains(&tuple_size) {
            return Err(EngineError::invalid(format!(
                "{} tuple size {} not in {:?}",
                attribute.name(),
                tuple_size,
                allowed
            )));
        }

        let data = data.map(|v| AttributeData::new(v, tuple_size)).transpose()?;
        if let Some(data) = &data {
            let count = data.vertex_count();
            match attribute {
                VertexAttribute::Position => self.drop_mismatched_streams(count),
                _ => {
                    let expected = self.vertex_count();
                    if self.coords.is_some() && count != expected {
                        return Err(EngineError::invalid(format!(
                            "{} has {count} vertices, positions have {expected}",
                            attribute.name()
                        )));
                    }
                }
            }
        }
        self.store_attribute(attribute, data);
        Ok(())
    }

    /// Normal and texture-coordinate streams must match the position count;
    /// new positions of a different length discard them.
    fn drop_mismatched_streams(&mut self, count: usize) {
        for (attribute, stream) in [
            (VertexAttribute::Normal, &mut self.normals),
            (VertexAttribute::TexCoord, &mut self.tex_coords),
        ] {
            if stream.as_ref().is_some_and(|s| s.vertex_count() != count) {
                log::warn!("shape: dropping {} stream, positions now have {count} vertices", attribute.name());
                *stream = None;
            }
        }
    }

    fn store_attribute(&mut self, attribute: VertexAttribute, data: Option<AttributeData>) {
        let slot = match attribute {
            VertexAttribute::Position => &mut self.coords,
            VertexAttribute::Normal => &mut self.normals,
            VertexAttribute::TexCoord => &mut self.tex_coords,
        };
        *slot = data;
        self.upload = UploadState::Dirty;
    }

    pub fn coords(&self) -> Option<&AttributeData> {
        self.coords.as_ref()
    }

    pub fn normals(&self) -> Option<&AttributeData> {
        self.normals.as_ref()
    }

    pub fn tex_coords(&self) -> Option<&AttributeData> {
        self.tex_coords.as_ref()
    }

    /// Vertices drawn per redraw; taken from the position array.
    pub fn vertex_count(&self) -> usize {
        self.coords.as_ref().map_or(0, AttributeData::vertex_count)
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload
    }

    // ── transform ──────────────────────────────────────────────────────────

    pub fn set_location(&mut self, x: f32, y: f32, z: f32) {
        self.location = Vec3::new(x, y, z);
    }

    pub fn set_size(&mut self, x: f32, y: f32, z: f32) {
        self.size = Vec3::new(x, y, z);
    }

    /// Stores an axis-angle rotation (radians).
    ///
    /// The rotation is kept for callers but is not part of the model matrix,
    /// which stays `translate * scale`.
    pub fn set_rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        self.rotation_angle = angle;
        self.rotation_axis = Vec3::new(x, y, z).normalize_or(Vec3::Z);
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn rotation(&self) -> (f32, Vec3) {
        (self.rotation_angle, self.rotation_axis)
    }

    /// Model matrix computed by the last redraw.
    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    fn compose_model(&self) -> Mat4 {
        Mat4::from_translation(self.location) * Mat4::from_scale(self.size)
    }

    // ── appearance ─────────────────────────────────────────────────────────

    pub fn set_color(&mut self, index: usize, color: Color) -> Result<(), EngineError> {
        let Some(slot) = self.colors.get_mut(index) else {
            log::warn!("shape: color index {index} out of range (max {MAX_COLORS})");
            return Err(EngineError::invalid(format!(
                "color index {index} must be below {MAX_COLORS}"
            )));
        };
        *slot = Some(color);
        Ok(())
    }

    pub fn set_nominal_color(&mut self, color: Color) {
        self.colors[0] = Some(color);
    }

    pub fn color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied().flatten()
    }

    pub fn nominal_color(&self) -> Color {
        self.colors[0].unwrap_or(Color::RED)
    }

    pub fn set_texture(&mut self, texture: Option<Rc<Texture<B>>>) {
        self.texture = texture;
    }

    pub fn texture(&self) -> Option<&Rc<Texture<B>>> {
        self.texture.as_ref()
    }

    #[inline]
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Mix between texture (1.0) and nominal color (0.0), clamped to `[0, 1]`.
    pub fn set_texture_weight(&mut self, weight: f32) {
        self.texture_weight = if weight.is_nan() { 0.0 } else { weight.clamp(0.0, 1.0) };
    }

    pub fn texture_weight(&self) -> f32 {
        self.texture_weight
    }

    // ── drawing ────────────────────────────────────────────────────────────

    /// Writes the shape uniforms, syncs dirty buffers and draws once.
    pub fn redraw(&mut self, backend: &mut B) {
        self.model = self.compose_model();

        backend.set_uniform(UniformSlot::Model, UniformValue::Mat4(self.model.to_cols_array()));
        backend.set_uniform(UniformSlot::Color, UniformValue::Vec4(self.nominal_color().to_array()));
        backend.set_uniform(UniformSlot::TextureWeight, UniformValue::Float(self.texture_weight));
        backend.set_uniform(UniformSlot::HasTexture, UniformValue::Int(i32::from(self.has_texture())));

        if self.upload == UploadState::Dirty {
            self.upload_buffers(backend);
        }

        let count = self.vertex_count();
        if count == 0 {
            log::debug!("shape: nothing to draw");
            return;
        }

        if let Some(texture) = &self.texture {
            texture.bind(backend);
        }

        let vertices = VertexArray {
            positions: &self.coord_vbo,
            normals: self.normals.as_ref().map(|_| &self.normal_vbo),
            tex_coords: self.tex_coords.as_ref().map(|_| &self.tex_coord_vbo),
        };
        backend.draw_triangles(vertices, count as u32);

        if let Some(texture) = &self.texture {
            texture.unbind(backend);
        }
        check_graphics_state(backend, "shape draw");
    }

    fn upload_buffers(&mut self, backend: &mut B) {
        self.upload = UploadState::Uploading;

        let pairs = [
            (&self.coords, &mut self.coord_vbo),
            (&self.normals, &mut self.normal_vbo),
            (&self.tex_coords, &mut self.tex_coord_vbo),
        ];
        for (data, vbo) in pairs {
            if let Some(data) = data {
                backend.upload_vertex_buffer(vbo, data.values(), data.tuple_size());
            }
        }

        check_graphics_state(backend, "buffer upload");
        self.upload = UploadState::Clean;
    }
}

impl<B: GraphicsBackend> std::fmt::Debug for Shape<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shape")
            .field("vertices", &self.vertex_count())
            .field("location", &self.location)
            .field("size", &self.size)
            .field("color", &self.nominal_color())
            .field("textured", &self.has_texture())
            .field("texture_weight", &self.texture_weight)
            .field("upload", &self.upload)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{cube, cylinder, quad};
    use crate::render::{Command, HeadlessBackend};
    use crate::texture::TextureImage;

    fn backend() -> HeadlessBackend {
        HeadlessBackend::new()
    }

    fn draws(cmds: &[Command]) -> Vec<Command> {
        cmds.iter().filter(|c| matches!(c, Command::Draw { .. })).cloned().collect()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_shape_defaults() {
        let mut b = backend();
        let s = Shape::new(&mut b).unwrap();
        assert_eq!(s.nominal_color(), Color::RED);
        assert_eq!(s.texture_weight(), 1.0);
        assert!(!s.has_texture());
        assert_eq!(s.vertex_count(), 0);
        assert_eq!(s.upload_state(), UploadState::Dirty);
    }

    #[test]
    fn buffer_creation_failure_surfaces() {
        let mut b = backend();
        b.set_fail_resources(true);
        assert!(matches!(Shape::new(&mut b), Err(EngineError::Resource(_))));
    }

    #[test]
    fn geometry_counts_agree() {
        let mut b = backend();
        for g in [cube(), quad(), cylinder(9).unwrap()] {
            let s = Shape::with_geometry(&mut b, g).unwrap();
            let n = s.normals().unwrap();
            assert_eq!(s.vertex_count(), n.len() / n.tuple_size());
        }
    }

    // ── data setters ──────────────────────────────────────────────────────

    #[test]
    fn bad_tuple_sizes_leave_buffers_unchanged() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, quad()).unwrap();
        let before = (s.coords().cloned(), s.normals().cloned(), s.tex_coords().cloned());

        assert!(s.set_coord_data(Some(vec![0.0; 5]), 5).unwrap_err().is_invalid_argument());
        assert!(s.set_coord_data(Some(vec![0.0; 1]), 1).is_err());
        assert!(s.set_normal_data(Some(vec![0.0; 2]), 2).is_err());
        assert!(s.set_texture_coord_data(Some(vec![0.0; 4]), 4).is_err());

        let after = (s.coords().cloned(), s.normals().cloned(), s.tex_coords().cloned());
        assert_eq!(before, after);
    }

    #[test]
    fn ragged_data_is_rejected() {
        let mut b = backend();
        let mut s = Shape::new(&mut b).unwrap();
        assert!(s.set_coord_data(Some(vec![0.0; 7]), 3).is_err());
        assert!(s.coords().is_none());
    }

    #[test]
    fn accepted_tuple_sizes() {
        let mut b = backend();
        let mut s = Shape::new(&mut b).unwrap();
        for t in [2, 3, 4] {
            s.set_coord_data(Some(vec![0.0; t * 3]), t).unwrap();
            assert_eq!(s.vertex_count(), 3);
        }
        s.set_normal_data(Some(vec![0.0; 12]), 4).unwrap();
        s.set_texture_coord_data(Some(vec![0.0; 3]), 1).unwrap();
        assert_eq!(s.tex_coords().unwrap().vertex_count(), 3);
    }

    #[test]
    fn short_normal_stream_is_rejected() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, cube()).unwrap();
        let before = (s.normals().cloned(), s.tex_coords().cloned());

        assert!(s.set_normal_data(Some(vec![0.0, 0.0, 1.0]), 3).unwrap_err().is_invalid_argument());
        assert!(s.set_texture_coord_data(Some(vec![0.0, 0.0]), 2).unwrap_err().is_invalid_argument());
        assert_eq!((s.normals().cloned(), s.tex_coords().cloned()), before);

        s.redraw(&mut b);
        assert!(matches!(
            draws(&b.commands())[..],
            [Command::Draw { vertex_count: 36, normals: Some(_), tex_coords: Some(_), .. }]
        ));
    }

    #[test]
    fn new_positions_drop_streams_of_other_length() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, cube()).unwrap();

        s.set_coord_data(Some(vec![0.0; 9]), 3).unwrap();
        assert_eq!(s.vertex_count(), 3);
        assert!(s.normals().is_none());
        assert!(s.tex_coords().is_none());

        s.set_normal_data(Some(vec![0.0; 9]), 3).unwrap();
        s.set_coord_data(Some(vec![1.0; 9]), 3).unwrap();
        assert_eq!(s.normals().map(AttributeData::vertex_count), Some(3));
    }

    #[test]
    fn streams_may_precede_positions() {
        let mut b = backend();
        let mut s = Shape::new(&mut b).unwrap();
        s.set_normal_data(Some(vec![0.0; 6]), 3).unwrap();
        s.set_coord_data(Some(vec![0.0; 6]), 3).unwrap();
        assert_eq!(s.normals().map(AttributeData::vertex_count), Some(2));
    }

    #[test]
    fn none_clears_buffer() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, cube()).unwrap();
        s.set_coord_data(None, 3).unwrap();
        assert_eq!(s.vertex_count(), 0);
        assert_eq!(s.upload_state(), UploadState::Dirty);
    }

    // ── appearance ────────────────────────────────────────────────────────

    #[test]
    fn color_index_bound() {
        let mut b = backend();
        let mut s = Shape::new(&mut b).unwrap();
        assert!(s.set_color(MAX_COLORS - 1, Color::WHITE).is_ok());
        assert!(s.set_color(MAX_COLORS, Color::WHITE).unwrap_err().is_invalid_argument());
        assert_eq!(s.color(MAX_COLORS - 1), Some(Color::WHITE));
        assert_eq!(s.color(MAX_COLORS), None);
        assert_eq!(s.nominal_color(), Color::RED);
    }

    #[test]
    fn texture_weight_is_clamped() {
        let mut b = backend();
        let mut s = Shape::new(&mut b).unwrap();
        s.set_texture_weight(1.7);
        assert_eq!(s.texture_weight(), 1.0);
        s.set_texture_weight(-0.2);
        assert_eq!(s.texture_weight(), 0.0);
        s.set_texture_weight(0.4);
        assert_eq!(s.texture_weight(), 0.4);
    }

    #[test]
    fn rotation_is_stored_normalized_but_not_composed() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, cube()).unwrap();
        s.set_rotate(1.0, 0.0, 3.0, 0.0);
        assert_eq!(s.rotation(), (1.0, Vec3::Y));
        s.redraw(&mut b);
        assert_eq!(s.model_matrix(), Mat4::IDENTITY);
    }

    // ── redraw ────────────────────────────────────────────────────────────

    #[test]
    fn model_is_translate_times_scale() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, cube()).unwrap();
        s.set_location(1.0, 2.0, 3.0);
        s.set_size(2.0, 2.0, 2.0);
        s.redraw(&mut b);
        let p = s.model_matrix().transform_point3(Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(p, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(
            b.uniform(UniformSlot::Model),
            Some(UniformValue::Mat4(s.model_matrix().to_cols_array()))
        );
    }

    #[test]
    fn first_redraw_uploads_then_cleans() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, cube()).unwrap();
        s.redraw(&mut b);
        assert_eq!(s.upload_state(), UploadState::Clean);
        let uploads = b.commands().iter().filter(|c| matches!(c, Command::UploadBuffer { .. })).count();
        assert_eq!(uploads, 3);

        b.take_commands();
        s.redraw(&mut b);
        assert!(!b.commands().iter().any(|c| matches!(c, Command::UploadBuffer { .. })));
    }

    #[test]
    fn redraw_is_idempotent() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, cylinder(8).unwrap()).unwrap();
        s.redraw(&mut b);

        b.take_commands();
        s.redraw(&mut b);
        let first = b.take_commands();
        s.redraw(&mut b);
        let second = b.take_commands();

        assert_eq!(first, second);
        assert_eq!(draws(&first).len(), 1);
    }

    #[test]
    fn one_draw_covers_every_vertex() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, cube()).unwrap();
        s.redraw(&mut b);
        let d = draws(&b.commands());
        assert!(matches!(d[..], [Command::Draw { vertex_count: 36, normals: Some(_), tex_coords: Some(_), .. }]));
    }

    #[test]
    fn textured_shape_binds_around_draw() {
        let mut b = backend();
        let tex = Rc::new(
            Texture::new(&mut b, &TextureImage::solid(2, 2, [255; 4]), Default::default()).unwrap(),
        );
        let mut s = Shape::with_geometry(&mut b, quad()).unwrap();
        s.set_texture(Some(Rc::clone(&tex)));
        assert!(s.has_texture());

        b.take_commands();
        s.redraw(&mut b);
        let cmds = b.commands();
        let bind = cmds.iter().position(|c| matches!(c, Command::BindTexture { .. })).unwrap();
        let draw = cmds.iter().position(|c| matches!(c, Command::Draw { .. })).unwrap();
        let unbind = cmds.iter().position(|c| matches!(c, Command::UnbindTexture)).unwrap();
        assert!(bind < draw && draw < unbind);
        assert_eq!(b.uniform(UniformSlot::HasTexture), Some(UniformValue::Int(1)));
    }

    #[test]
    fn untextured_shape_reports_no_texture() {
        let mut b = backend();
        let mut s = Shape::with_geometry(&mut b, quad()).unwrap();
        s.redraw(&mut b);
        assert_eq!(b.uniform(UniformSlot::HasTexture), Some(UniformValue::Int(0)));
        assert!(!b.commands().iter().any(|c| matches!(c, Command::BindTexture { .. })));
    }

    #[test]
    fn empty_shape_skips_draw() {
        let mut b = backend();
        let mut s = Shape::new(&mut b).unwrap();
        s.redraw(&mut b);
        assert_eq!(b.draw_calls(), 0);
    }

    #[test]
    fn shared_texture_outlives_first_shape() {
        let mut b = backend();
        let tex = Rc::new(
            Texture::new(&mut b, &TextureImage::solid(2, 2, [255; 4]), Default::default()).unwrap(),
        );
        let mut a = Shape::with_geometry(&mut b, quad()).unwrap();
        let mut c = Shape::with_geometry(&mut b, quad()).unwrap();
        a.set_texture(Some(Rc::clone(&tex)));
        c.set_texture(Some(Rc::clone(&tex)));
        drop(tex);
        drop(a);
        assert!(!b.commands().iter().any(|cmd| matches!(cmd, Command::ReleaseTexture { .. })));
        drop(c);
        assert!(b.commands().iter().any(|cmd| matches!(cmd, Command::ReleaseTexture { .. })));
    }

    #[test]
    fn dropping_shape_releases_its_buffers() {
        let mut b = backend();
        let s = Shape::with_geometry(&mut b, cube()).unwrap();
        drop(s);
        let released = b.commands().iter().filter(|c| matches!(c, Command::ReleaseBuffer { .. })).count();
        assert_eq!(released, 3);
    }
}
