//! Color model shared by shapes and the shader interface.

pub mod color;

pub use color::Color;
