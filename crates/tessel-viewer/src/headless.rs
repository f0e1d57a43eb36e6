//! Window-less run: builds the catalog on the recording backend and reports
//! what each scene would have sent to the GPU.

use anyhow::Result;

use tessel_engine::render::{Command, HeadlessBackend, UniformSlot};

use crate::catalog::{CatalogConfig, build_catalog};

/// Per-scene tally of recorded backend calls.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SceneReport {
    pub title: String,
    pub shapes: usize,
    pub draws: usize,
    pub uploads: usize,
    pub transform_uploads: usize,
}

pub fn run(config: &CatalogConfig, frames: u32) -> Result<Vec<SceneReport>> {
    let mut backend = HeadlessBackend::new();
    let mut scenes = build_catalog(&mut backend, config)?;
    backend.take_commands();

    let mut reports = Vec::with_capacity(scenes.len());
    for scene in &mut scenes {
        scene.activate();
        for _ in 0..frames {
            scene.redraw(&mut backend);
        }

        let cmds = backend.take_commands();
        let report = SceneReport {
            title: scene.title().to_string(),
            shapes: scene.len(),
            draws: cmds.iter().filter(|c| matches!(c, Command::Draw { .. })).count(),
            uploads: cmds.iter().filter(|c| matches!(c, Command::UploadBuffer { .. })).count(),
            transform_uploads: cmds
                .iter()
                .filter(|c| matches!(c, Command::SetUniform { slot: UniformSlot::ViewProjection, .. }))
                .count(),
        };
        log::info!(
            "{}: {} shapes, {} draws, {} buffer uploads, {} transform uploads",
            report.title,
            report.shapes,
            report.draws,
            report.uploads,
            report.transform_uploads
        );
        reports.push(report);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_upload_once_and_transform_once_per_scene() {
        let config = CatalogConfig { images: Vec::new(), cylinder_faces: 9 };
        let reports = run(&config, 3).unwrap();

        assert_eq!(reports.len(), 13);
        for r in &reports {
            assert_eq!(r.draws, r.shapes * 3, "{}", r.title);
            // positions, normals and texcoords, first frame only
            assert_eq!(r.uploads, r.shapes * 3, "{}", r.title);
            assert_eq!(r.transform_uploads, 1, "{}", r.title);
        }
    }

    #[test]
    fn zero_frames_draws_nothing() {
        let config = CatalogConfig { images: Vec::new(), cylinder_faces: 4 };
        let reports = run(&config, 0).unwrap();
        assert!(reports.iter().all(|r| r.draws == 0));
    }
}
