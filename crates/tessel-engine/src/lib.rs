//! Tessel engine crate.
//!
//! This crate owns the textured-primitive core (geometry, textures, shapes,
//! scenes), the backend seam those types draw through, and the platform + GPU
//! runtime pieces used by the viewer.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod texture;
pub mod render;
pub mod scene;

pub use error::{EngineError, ResourceError};
