//! Shapes and scenes: the per-object transform/resource lifecycle and the
//! per-scene view/projection composition.

#[allow(clippy::module_inception)]
mod scene;
mod shape;
mod view;

pub use scene::Scene;
pub use shape::{MAX_COLORS, Shape, UploadState};
pub use view::{LookAt, Orthographic, Perspective};
