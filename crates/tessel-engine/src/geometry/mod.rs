//! Flat triangle-list generators for the built-in primitives.
//!
//! Every generator produces a non-indexed (duplicated-vertex) triangle list:
//! positions, normals and texture coordinates as flat `f32` arrays, built once
//! and never mutated afterwards.

mod cube;
mod cylinder;
mod quad;

pub use cube::cube;
pub use cylinder::{CYLINDER_HEIGHT, CYLINDER_RADIUS, CYLINDER_TOP, cylinder};
pub use quad::{quad, quad_tiled};

use crate::error::EngineError;

/// Flat vertex-attribute array plus its components-per-vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeData {
    values: Vec<f32>,
    tuple_size: usize,
}

impl AttributeData {
    /// Validates `values.len() % tuple_size == 0` and wraps the array.
    pub fn new(values: Vec<f32>, tuple_size: usize) -> Result<Self, EngineError> {
        if tuple_size == 0 {
            return Err(EngineError::invalid("tuple size must be non-zero"));
        }
        if values.len() % tuple_size != 0 {
            return Err(EngineError::invalid(format!(
                "attribute length {} is not a multiple of tuple size {}",
                values.len(),
                tuple_size
            )));
        }
        Ok(Self { values, tuple_size })
    }

    /// Generators produce lengths that are multiples by construction.
    pub(crate) fn from_tuples<const N: usize>(tuples: Vec<[f32; N]>) -> Self {
        Self {
            values: tuples.into_iter().flatten().collect(),
            tuple_size: N,
        }
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.values.len() / self.tuple_size
    }

    /// Iterates the array one vertex (tuple) at a time.
    pub fn tuples(&self) -> std::slice::ChunksExact<'_, f32> {
        self.values.chunks_exact(self.tuple_size)
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// The three attribute arrays that make up one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub positions: AttributeData,
    pub normals: AttributeData,
    pub tex_coords: AttributeData,
}

impl Geometry {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.vertex_count()
    }

    /// True when all three arrays describe the same number of vertices.
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.vertex_count();
        self.normals.vertex_count() == n && self.tex_coords.vertex_count() == n
    }
}

/// Built-in primitive selector used by scene catalogs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    Cube,
    Quad,
    QuadTiled,
    Cylinder { faces: u32 },
}

impl Primitive {
    pub fn build(self) -> Result<Geometry, EngineError> {
        match self {
            Primitive::Cube => Ok(cube()),
            Primitive::Quad => Ok(quad()),
            Primitive::QuadTiled => Ok(quad_tiled()),
            Primitive::Cylinder { faces } => cylinder(faces),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Cube => "cube",
            Primitive::Quad => "quad",
            Primitive::QuadTiled => "quad (tiled)",
            Primitive::Cylinder { .. } => "cylinder",
        }
    }
}
