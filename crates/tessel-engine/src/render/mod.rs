//! Rendering seam and its implementations.
//!
//! Shapes and scenes never talk to a graphics API directly. They issue a small
//! GL-style command vocabulary (create/upload buffers, set uniforms, bind a
//! texture, draw a triangle list) through [`GraphicsBackend`], which is passed
//! explicitly to every constructor and redraw call.
//!
//! Implementations:
//! - [`GpuBackend`]: wgpu; records the stream and replays it in one pass
//! - [`HeadlessBackend`]: records every command for inspection

mod backend;
mod ctx;
pub mod diagnostics;
mod gpu;
mod headless;

pub use backend::{
    GraphicsBackend, UniformSlot, UniformValue, VertexArray, VertexAttribute,
};
pub use ctx::{RenderCtx, RenderTarget};
pub use diagnostics::check_graphics_state;
pub use gpu::{GpuBackend, GpuBackendInit, GpuBuffer, GpuTexture, OPTIONAL_FEATURES, PolygonMode};
pub use headless::{BufferId, Command, HeadlessBackend, HeadlessBuffer, HeadlessTexture, TextureId};
