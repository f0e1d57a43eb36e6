use thiserror::Error;

/// Failure to acquire a GPU-side object.
///
/// Surfaced as a recoverable result so callers can retry or substitute a
/// placeholder (for example an untextured shape).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("failed to create {attribute} vertex buffer: {reason}")]
    BufferCreation {
        attribute: &'static str,
        reason: String,
    },

    #[error("failed to create {width}x{height} texture: {reason}")]
    TextureCreation {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("not supported by the active backend: {0}")]
    Unsupported(String),
}

/// Errors reported by shape, scene and geometry operations.
///
/// `InvalidArgument` is never fatal: the rejected operation leaves state
/// unchanged and the caller decides whether to log or ignore it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
