use super::{AttributeData, Geometry};

const H: f32 = 0.5;

// Corners: (l)eft/(r)ight, (b)ottom/(t)op, (n)ear/(f)ar.
const LBN: [f32; 3] = [-H, -H, H];
const RBN: [f32; 3] = [H, -H, H];
const RTN: [f32; 3] = [H, H, H];
const LTN: [f32; 3] = [-H, H, H];
const LBF: [f32; 3] = [-H, -H, -H];
const RBF: [f32; 3] = [H, -H, -H];
const RTF: [f32; 3] = [H, H, -H];
const LTF: [f32; 3] = [-H, H, -H];

/// Face order: right, top, back, left, bottom, front. Each face is two
/// counter-clockwise triangles seen from outside.
const FACES: [[[f32; 3]; 6]; 6] = [
    [RBN, RBF, RTF, RBN, RTF, RTN],
    [LTN, RTN, RTF, LTN, RTF, LTF],
    [RBF, LBF, LTF, RBF, LTF, RTF],
    [LBF, LBN, LTN, LBF, LTN, LTF],
    [LBF, RBF, RBN, LBF, RBN, LBN],
    [LBN, RBN, RTN, LBN, RTN, LTN],
];

const FACE_UV: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

/// Unit cube centered at the origin: 36 vertices.
///
/// Normals are the corner positions themselves rather than per-face normals;
/// nothing in the pipeline lights the surface, so the shader only needs a
/// value per vertex.
pub fn cube() -> Geometry {
    let corners: Vec<[f32; 3]> = FACES.iter().flatten().copied().collect();
    let uvs: Vec<[f32; 2]> = FACES.iter().flat_map(|_| FACE_UV).collect();

    Geometry {
        positions: AttributeData::from_tuples(corners.clone()),
        normals: AttributeData::from_tuples(corners),
        tex_coords: AttributeData::from_tuples(uvs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle_normals(g: &Geometry) -> Vec<Vec3> {
        let pts: Vec<Vec3> = g.positions.tuples().map(Vec3::from_slice).collect();
        pts.chunks_exact(3)
            .flat_map(|t| {
                let n = (t[1] - t[0]).cross(t[2] - t[0]).normalize();
                [n; 3]
            })
            .collect()
    }

    #[test]
    fn has_36_vertices() {
        let g = cube();
        assert_eq!(g.vertex_count(), 36);
        assert_eq!(g.positions.len(), 108);
        assert_eq!(g.tex_coords.len(), 72);
    }

    #[test]
    fn all_coordinates_are_half_units() {
        assert!(cube().positions.values().iter().all(|&v| v == 0.5 || v == -0.5));
    }

    #[test]
    fn six_face_directions_each_repeated_six_times() {
        let normals = triangle_normals(&cube());
        let mut distinct: Vec<(Vec3, usize)> = Vec::new();
        for n in normals {
            match distinct.iter_mut().find(|(d, _)| d.abs_diff_eq(n, 1e-6)) {
                Some((_, count)) => *count += 1,
                None => distinct.push((n, 1)),
            }
        }
        assert_eq!(distinct.len(), 6);
        assert!(distinct.iter().all(|&(_, c)| c == 6));
    }

    #[test]
    fn faces_wind_outward() {
        let g = cube();
        let pts: Vec<Vec3> = g.positions.tuples().map(Vec3::from_slice).collect();
        for (tri, n) in pts.chunks_exact(3).zip(triangle_normals(&g).chunks_exact(3)) {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            assert!(centroid.dot(n[0]) > 0.0, "inward-facing triangle at {centroid}");
        }
    }

    #[test]
    fn normals_equal_positions() {
        let g = cube();
        assert_eq!(g.normals.values(), g.positions.values());
    }
}
