use super::{AttributeData, Geometry};

const H: f32 = 0.5;

const FRONT: [[f32; 3]; 6] = [
    [-H, -H, 0.0],
    [H, -H, 0.0],
    [H, H, 0.0],
    [-H, -H, 0.0],
    [H, H, 0.0],
    [-H, H, 0.0],
];

const BACK: [[f32; 3]; 6] = [
    [H, -H, 0.0],
    [-H, -H, 0.0],
    [-H, H, 0.0],
    [H, -H, 0.0],
    [-H, H, 0.0],
    [H, H, 0.0],
];

const FRONT_UV: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

const BACK_UV: [[f32; 2]; 6] = [
    [1.0, 0.0],
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
];

/// Two-sided unit square in the `z = 0` plane: 12 vertices.
pub fn quad() -> Geometry {
    build(1.0)
}

/// [`quad`] with texture coordinates running over `[0, 2]`, so the texture
/// repeats twice per axis and wrap modes become visible.
pub fn quad_tiled() -> Geometry {
    build(2.0)
}

fn build(uv_scale: f32) -> Geometry {
    let positions: Vec<[f32; 3]> = FRONT.iter().chain(BACK.iter()).copied().collect();
    let normals: Vec<[f32; 3]> = std::iter::repeat_n([0.0, 0.0, 1.0], FRONT.len())
        .chain(std::iter::repeat_n([0.0, 0.0, -1.0], BACK.len()))
        .collect();
    let uvs: Vec<[f32; 2]> = FRONT_UV
        .iter()
        .chain(BACK_UV.iter())
        .map(|&[u, v]| [u * uv_scale, v * uv_scale])
        .collect();

    Geometry {
        positions: AttributeData::from_tuples(positions),
        normals: AttributeData::from_tuples(normals),
        tex_coords: AttributeData::from_tuples(uvs),
    }
}
