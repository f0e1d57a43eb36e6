use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::render::{UniformSlot, UniformValue};

/// CPU mirror of the WGSL `ShapeUniforms` block (160 bytes).
///
///  offset   0  pvs          mat4x4<f32>
///  offset  64  model        mat4x4<f32>
///  offset 128  color        vec4<f32>
///  offset 144  tex_weight   f32
///  offset 148  has_texture  i32
///  offset 152  _pad         vec2<f32>
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct ShapeUniforms {
    pub pvs: [f32; 16],
    pub model: [f32; 16],
    pub color: [f32; 4],
    pub tex_weight: f32,
    pub has_texture: i32,
    pub _pad: [f32; 2],
}

impl Default for ShapeUniforms {
    fn default() -> Self {
        Self {
            pvs: Mat4::IDENTITY.to_cols_array(),
            model: Mat4::IDENTITY.to_cols_array(),
            color: [1.0, 1.0, 1.0, 1.0],
            tex_weight: 0.0,
            has_texture: 0,
            _pad: [0.0; 2],
        }
    }
}

impl ShapeUniforms {
    pub(super) const SIZE: u64 = std::mem::size_of::<ShapeUniforms>() as u64;

    /// Stores `value` in `slot`; returns `false` when the value's type does
    /// not match the slot.
    pub(super) fn apply(&mut self, slot: UniformSlot, value: UniformValue) -> bool {
        match (slot, value) {
            (UniformSlot::ViewProjection, UniformValue::Mat4(m)) => self.pvs = m,
            (UniformSlot::Model, UniformValue::Mat4(m)) => self.model = m,
            (UniformSlot::Color, UniformValue::Vec4(c)) => self.color = c,
            (UniformSlot::TextureWeight, UniformValue::Float(w)) => self.tex_weight = w,
            (UniformSlot::HasTexture, UniformValue::Int(i)) => self.has_texture = i,
            _ => return false,
        }
        true
    }
}

/// Rounds `size` up to the device's dynamic-offset alignment.
pub(super) fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_wgsl_block() {
        assert_eq!(ShapeUniforms::SIZE, 160);
        assert_eq!(std::mem::offset_of!(ShapeUniforms, color), 128);
        assert_eq!(std::mem::offset_of!(ShapeUniforms, tex_weight), 144);
        assert_eq!(std::mem::offset_of!(ShapeUniforms, has_texture), 148);
    }

    #[test]
    fn apply_routes_by_slot() {
        let mut u = ShapeUniforms::default();
        assert!(u.apply(UniformSlot::TextureWeight, UniformValue::Float(0.5)));
        assert!(u.apply(UniformSlot::HasTexture, UniformValue::Int(1)));
        assert_eq!((u.tex_weight, u.has_texture), (0.5, 1));
    }

    #[test]
    fn apply_rejects_type_mismatch() {
        let mut u = ShapeUniforms::default();
        assert!(!u.apply(UniformSlot::Model, UniformValue::Float(1.0)));
        assert_eq!(u, ShapeUniforms::default());
    }

    #[test]
    fn stride_rounds_up() {
        assert_eq!(aligned_stride(160, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(300, 256), 512);
        assert_eq!(aligned_stride(160, 0), 160);
    }
}
