use std::f64::consts::TAU;

use super::{AttributeData, Geometry};
use crate::error::EngineError;

pub const CYLINDER_RADIUS: f32 = 0.3;
pub const CYLINDER_HEIGHT: f32 = 0.8;
/// z of the top cap; the bottom cap sits at `CYLINDER_TOP - CYLINDER_HEIGHT`.
pub const CYLINDER_TOP: f32 = 0.5;

const TOP_UV: [[f32; 2]; 3] = [[0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
const BOTTOM_UV: [[f32; 2]; 3] = [[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]];
const SIDE_UV: [[f32; 2]; 6] = [
    [0.0, 1.0],
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 1.0],
];

/// Capped cylinder along z approximated by `faces` wedges.
///
/// Layout: all top-cap fan triangles, then all bottom-cap triangles, then the
/// lateral band (two triangles per wedge). `12 * faces` vertices in total.
pub fn cylinder(faces: u32) -> Result<Geometry, EngineError> {
    if faces == 0 {
        return Err(EngineError::invalid("cylinder needs at least one face"));
    }

    let top = CYLINDER_TOP;
    let bottom = CYLINDER_TOP - CYLINDER_HEIGHT;
    let rim: Vec<(f32, f32)> = (0..=faces)
        .map(|i| {
            let a = TAU * f64::from(i) / f64::from(faces);
            let r = f64::from(CYLINDER_RADIUS);
            ((r * a.cos()) as f32, (r * a.sin()) as f32)
        })
        .collect();

    let n = faces as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(12 * n);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(12 * n);

    for w in rim.windows(2) {
        let ((px, py), (nx, ny)) = (w[0], w[1]);
        positions.extend([[0.0, 0.0, top], [px, py, top], [nx, ny, top]]);
        uvs.extend(TOP_UV);
    }
    for w in rim.windows(2) {
        let ((px, py), (nx, ny)) = (w[0], w[1]);
        positions.extend([[0.0, 0.0, bottom], [nx, ny, bottom], [px, py, bottom]]);
        uvs.extend(BOTTOM_UV);
    }
    for w in rim.windows(2) {
        let ((px, py), (nx, ny)) = (w[0], w[1]);
        positions.extend([
            [px, py, top],
            [px, py, bottom],
            [nx, ny, bottom],
            [px, py, top],
            [nx, ny, bottom],
            [nx, ny, top],
        ]);
        uvs.extend(SIDE_UV);
    }

    Ok(Geometry {
        normals: AttributeData::from_tuples(positions.clone()),
        positions: AttributeData::from_tuples(positions),
        tex_coords: AttributeData::from_tuples(uvs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn eight_faces_give_288_floats() {
        let g = cylinder(8).unwrap();
        assert_eq!(g.positions.len(), 288);
        assert_eq!(g.vertex_count(), 96);
        assert!(g.is_consistent());
    }

    #[test]
    fn single_face_is_degenerate_but_valid() {
        let g = cylinder(1).unwrap();
        assert_eq!(g.vertex_count(), 12);
    }

    #[test]
    fn zero_faces_is_invalid() {
        assert!(cylinder(0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn caps_sit_at_expected_heights() {
        let g = cylinder(6).unwrap();
        let z: Vec<f32> = g.positions.tuples().map(|p| p[2]).collect();
        assert!(z[..18].iter().all(|&v| v == CYLINDER_TOP));
        let bottom = CYLINDER_TOP - CYLINDER_HEIGHT;
        assert!(z[18..36].iter().all(|&v| (v - bottom).abs() < 1e-6));
    }

    #[test]
    fn rim_points_lie_on_radius() {
        let g = cylinder(12).unwrap();
        for p in g.positions.tuples() {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!(r < 1e-6 || (r - CYLINDER_RADIUS).abs() < 1e-5, "r = {r}");
        }
    }

    #[test]
    fn first_rim_point_is_at_angle_zero() {
        let g = cylinder(4).unwrap();
        let second = &g.positions.values()[3..6];
        assert!((second[0] - CYLINDER_RADIUS).abs() < 1e-6);
        assert!(second[1].abs() < 1e-6);
    }

    #[test]
    fn triangles_wind_outward() {
        let g = cylinder(16).unwrap();
        let pts: Vec<Vec3> = g.positions.tuples().map(Vec3::from_slice).collect();
        let mid = Vec3::new(0.0, 0.0, CYLINDER_TOP - CYLINDER_HEIGHT / 2.0);
        for t in pts.chunks_exact(3) {
            let n = (t[1] - t[0]).cross(t[2] - t[0]);
            let c = (t[0] + t[1] + t[2]) / 3.0 - mid;
            assert!(c.dot(n) > 0.0);
        }
    }
}
