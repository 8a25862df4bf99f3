use thiserror::Error;

/// Errors raised while building geometry, uploading instance data or rendering a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// No adapter/device could be acquired. Fatal at setup.
    #[error("no usable rendering backend: {0}")]
    UnsupportedBackend(String),

    /// The surface resolved to a zero height; the frame is skipped.
    #[error("surface {width}x{height} has no drawable area, frame skipped")]
    DegenerateSurface { width: u32, height: u32 },

    /// A write disagrees with the allocated buffer size (object-count or layout drift).
    #[error("buffer `{label}` holds {expected} bytes but a {actual}-byte write was issued")]
    BufferSizeMismatch {
        label: &'static str,
        expected: u64,
        actual: u64,
    },

    /// Opaque failure from the backend while submitting a frame.
    #[error("backend submission failed: {reason}")]
    BackendSubmission { reason: String, recoverable: bool },

    /// A ring needs at least one subdivision.
    #[error("ring mesh requires at least one subdivision")]
    ZeroSubdivisions,
}

impl RenderError {
    /// Whether the error must abort the program rather than drop the current frame.
    pub fn is_fatal(&self) -> bool {
        match self {
            RenderError::DegenerateSurface { .. } => false,
            RenderError::BackendSubmission { recoverable, .. } => !recoverable,
            RenderError::UnsupportedBackend(_)
            | RenderError::BufferSizeMismatch { .. }
            | RenderError::ZeroSubdivisions => true,
        }
    }
}
