use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{Mat4, Vec2, Vec3};

use crate::render::{GraphicsBackend, UniformSlot, UniformValue, check_graphics_state};

use super::view::{LookAt, Orthographic, Perspective};
use super::Shape;

static SCENE_SERIAL: AtomicUsize = AtomicUsize::new(1);

/// Closest the eye may dolly toward the look-at point.
const MIN_EYE_DISTANCE: f32 = 0.05;

/// Ordered shapes plus the camera that views them.
///
/// The composed matrix `projection * view * sceneRotation` is cached and
/// recomputed lazily: setters only mark state dirty, and the next
/// [`Scene::redraw`] recomputes it once before drawing any shape.
pub struct Scene<B: GraphicsBackend> {
    title: String,
    index: usize,
    shapes: Vec<Shape<B>>,

    look_at: LookAt,
    dolly: f32,
    pan: Vec2,
    perspective: Perspective,
    ortho: Orthographic,
    use_perspective: bool,
    rotation: Vec3, // radians

    view_dirty: bool,
    rotation_dirty: bool,
    upload_pending: bool,

    view: Mat4,
    projection: Mat4,
    scene_rotation: Mat4,
    composed: [f32; 16],
    compositions: u64,
}

impl<B: GraphicsBackend> Default for Scene<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: GraphicsBackend> Scene<B> {
    /// Empty scene titled `Scene <n>`, `n` counting every scene created in the
    /// process.
    pub fn new() -> Self {
        let index = SCENE_SERIAL.fetch_add(1, Ordering::Relaxed);
        Self {
            title: format!("Scene {index}"),
            index,
            shapes: Vec::new(),
            look_at: LookAt::default(),
            dolly: 0.0,
            pan: Vec2::ZERO,
            perspective: Perspective::default(),
            ortho: Orthographic::default(),
            use_perspective: true,
            rotation: Vec3::ZERO,
            view_dirty: true,
            rotation_dirty: true,
            upload_pending: false,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            scene_rotation: Mat4::IDENTITY,
            composed: Mat4::IDENTITY.to_cols_array(),
            compositions: 0,
        }
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        let mut scene = Self::new();
        scene.title = title.into();
        scene
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Process-wide creation serial.
    pub fn index(&self) -> usize {
        self.index
    }

    // ── shapes ─────────────────────────────────────────────────────────────

    /// Appends a shape; shapes draw in insertion order.
    pub fn add_shape(&mut self, shape: Shape<B>) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Shape<B>] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape<B>] {
        &mut self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Applies the texture weight to every shape in the scene.
    pub fn set_texture_weight(&mut self, weight: f32) {
        for shape in &mut self.shapes {
            shape.set_texture_weight(weight);
        }
    }

    /// Texture weight of the first shape, or `1.0` for an empty scene.
    pub fn texture_weight(&self) -> f32 {
        self.shapes.first().map_or(1.0, Shape::texture_weight)
    }

    // ── camera ─────────────────────────────────────────────────────────────

    /// Stores normalized `eye` and `up` and the raw `at`, and drops any
    /// accumulated pan/zoom.
    pub fn set_look_at(&mut self, eye: Vec3, at: Vec3, up: Vec3) {
        self.look_at = LookAt::normalized(eye, at, up);
        self.dolly = 0.0;
        self.pan = Vec2::ZERO;
        self.mark_view_dirty();
    }

    /// Look-at parameters as last set, without pan/zoom offsets.
    pub fn look_at(&self) -> LookAt {
        self.look_at
    }

    /// Look-at parameters the view matrix is built from.
    pub fn effective_look_at(&self) -> LookAt {
        let forward = (self.look_at.at - self.look_at.eye).normalize_or_zero();
        LookAt {
            eye: self.look_at.eye + forward * self.dolly,
            at: self.look_at.at + self.pan.extend(0.0),
            up: self.look_at.up,
        }
    }

    pub fn set_perspective(&mut self, fovy_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.perspective = Perspective { fovy_degrees, aspect, near, far };
        self.mark_view_dirty();
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn set_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.ortho = Orthographic { left, right, bottom, top, near, far };
        self.mark_view_dirty();
    }

    pub fn ortho(&self) -> Orthographic {
        self.ortho
    }

    /// Narrows the orthographic window; see [`Orthographic::shrink`].
    pub fn zoom_ortho(&mut self, delta: f32) {
        self.ortho.shrink(delta);
        self.mark_view_dirty();
    }

    /// Updates the perspective aspect ratio, e.g. after a window resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 && aspect != self.perspective.aspect {
            self.perspective.aspect = aspect;
            self.mark_view_dirty();
        }
    }

    /// Selects the perspective (`true`) or orthographic (`false`) projection.
    pub fn use_perspective(&mut self, enabled: bool) {
        if self.use_perspective != enabled {
            self.use_perspective = enabled;
            self.mark_view_dirty();
        }
    }

    pub fn uses_perspective(&self) -> bool {
        self.use_perspective
    }

    pub fn zoom_in(&mut self, units: f32) {
        let limit = (self.look_at.distance() - MIN_EYE_DISTANCE).max(0.0);
        self.dolly = (self.dolly + units).min(limit);
        self.mark_view_dirty();
    }

    pub fn zoom_out(&mut self, units: f32) {
        self.zoom_in(-units);
    }

    pub fn pan_left(&mut self, units: f32) {
        self.pan.x -= units;
        self.mark_view_dirty();
    }

    pub fn pan_right(&mut self, units: f32) {
        self.pan.x += units;
        self.mark_view_dirty();
    }

    pub fn pan_up(&mut self, units: f32) {
        self.pan.y += units;
        self.mark_view_dirty();
    }

    pub fn pan_down(&mut self, units: f32) {
        self.pan.y -= units;
        self.mark_view_dirty();
    }

    #[inline]
    fn mark_view_dirty(&mut self) {
        self.view_dirty = true;
    }

    // ── scene rotation ─────────────────────────────────────────────────────

    pub fn rotate_x(&mut self, delta_degrees: f32) {
        self.rotation.x += delta_degrees.to_radians();
        self.rotation_dirty = true;
    }

    pub fn rotate_y(&mut self, delta_degrees: f32) {
        self.rotation.y += delta_degrees.to_radians();
        self.rotation_dirty = true;
    }

    pub fn rotate_z(&mut self, delta_degrees: f32) {
        self.rotation.z += delta_degrees.to_radians();
        self.rotation_dirty = true;
    }

    pub fn set_rotate_x(&mut self, degrees: f32) {
        self.rotation.x = degrees.to_radians();
        self.rotation_dirty = true;
    }

    pub fn set_rotate_y(&mut self, degrees: f32) {
        self.rotation.y = degrees.to_radians();
        self.rotation_dirty = true;
    }

    pub fn set_rotate_z(&mut self, degrees: f32) {
        self.rotation.z = degrees.to_radians();
        self.rotation_dirty = true;
    }

    /// Scene rotation angles in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    // ── composition ────────────────────────────────────────────────────────

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.view_dirty || self.rotation_dirty
    }

    /// Number of times the composed matrix has been recomputed.
    pub fn composition_count(&self) -> u64 {
        self.compositions
    }

    pub fn composed_matrix(&self) -> Mat4 {
        Mat4::from_cols_array(&self.composed)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn rotation_matrix(&self) -> Mat4 {
        self.scene_rotation
    }

    /// Makes this the current scene: the cached matrix is re-sent on the
    /// next redraw, since all scenes share the `uPVS` slot.
    pub fn activate(&mut self) {
        self.upload_pending = true;
    }

    fn recompose(&mut self) {
        if self.rotation_dirty {
            self.scene_rotation = Mat4::from_rotation_x(self.rotation.x)
                * Mat4::from_rotation_y(self.rotation.y)
                * Mat4::from_rotation_z(self.rotation.z);
            self.rotation_dirty = false;
        }
        if self.view_dirty {
            self.view = self.effective_look_at().matrix();
            self.projection = if self.use_perspective {
                self.perspective.matrix()
            } else {
                self.ortho.matrix()
            };
            self.view_dirty = false;
        }

        self.composed = (self.projection * self.view * self.scene_rotation).to_cols_array();
        self.compositions += 1;
        self.upload_pending = true;
        log::debug!("{}: recomposed view transform (#{})", self.title, self.compositions);
    }

    /// Uploads the composed matrix if needed, then redraws every shape.
    pub fn redraw(&mut self, backend: &mut B) {
        if self.is_dirty() {
            self.recompose();
        }
        if self.upload_pending {
            backend.set_uniform(UniformSlot::ViewProjection, UniformValue::Mat4(self.composed));
            self.upload_pending = false;
            check_graphics_state(backend, "scene transform upload");
        }

        for shape in &mut self.shapes {
            shape.redraw(backend);
        }
    }
}

impl<B: GraphicsBackend> std::fmt::Debug for Scene<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("title", &self.title)
            .field("shapes", &self.shapes.len())
            .field("look_at", &self.look_at)
            .field("use_perspective", &self.use_perspective)
            .field("rotation", &self.rotation)
            .field("compositions", &self.compositions)
            .finish_non_exhaustive()
    }
}
