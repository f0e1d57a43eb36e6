use glam::{Mat4, Vec3};

/// Camera placement for `look_at_rh`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LookAt {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
}

impl Default for LookAt {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 4.0),
            at: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl LookAt {
    /// Normalizes `eye` and `up`; `at` is kept as given.
    ///
    /// A zero `eye` falls back to `+z` and a zero `up` to `+y`. An `up`
    /// parallel to the line of sight is replaced by an axis perpendicular to
    /// it, so the view matrix stays finite.
    pub fn normalized(eye: Vec3, at: Vec3, up: Vec3) -> Self {
        let eye = eye.normalize_or(Vec3::Z);
        let mut up = up.normalize_or(Vec3::Y);
        let forward = (at - eye).normalize_or_zero();
        if forward != Vec3::ZERO && forward.cross(up).length_squared() < 1e-8 {
            up = forward.any_orthonormal_vector();
            log::debug!("look-at: up is parallel to the line of sight, using {up}");
        }
        Self { eye, at, up }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.at, self.up)
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.at)
    }
}

/// Symmetric perspective frustum. `fovy_degrees` is the full vertical angle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Perspective {
    pub fovy_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fovy_degrees: 90.0,
            aspect: 1.0,
            near: 0.1,
            far: 20.0,
        }
    }
}

impl Perspective {
    /// OpenGL clip convention (z in `[-1, 1]`).
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orthographic {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Orthographic {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: 0.1,
            far: 20.0,
        }
    }
}

/// Smallest half-extent [`Orthographic::shrink`] goes down to.
pub(crate) const ORTHO_MIN_EXTENT: f32 = 0.3;

impl Orthographic {
    /// OpenGL clip convention (z in `[-1, 1]`).
    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }

    /// Moves every side inward by `delta / 2`; once the window reaches
    /// `ORTHO_MIN_EXTENT` it snaps to `[-0.3, 0.3]` on both axes.
    pub fn shrink(&mut self, delta: f32) {
        let half = delta / 2.0;
        if self.left + half < -ORTHO_MIN_EXTENT {
            self.left += half;
            self.right -= half;
            self.bottom += half;
            self.top -= half;
        } else {
            self.left = -ORTHO_MIN_EXTENT;
            self.right = ORTHO_MIN_EXTENT;
            self.bottom = -ORTHO_MIN_EXTENT;
            self.top = ORTHO_MIN_EXTENT;
        }
    }
}
