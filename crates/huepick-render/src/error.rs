//! Rendering error types.

use huepick_core::HuepickError;
use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no usable format for this adapter.
    #[error("surface configuration failed")]
    SurfaceConfigurationFailed,

    /// A canvas or target was requested with no area.
    #[error("surface has no area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    /// Shader source could not be composed.
    #[error("shader composition failed: {0}")]
    ShaderCompositionFailed(String),

    /// The pick target does not exist (the canvas has no area).
    #[error("pick target unavailable")]
    PickTargetUnavailable,

    /// Mapping a staging buffer failed.
    #[error("readback failed: {0}")]
    ReadbackFailed(String),

    /// Only offscreen canvases can be captured.
    #[error("capture is only supported on offscreen canvases")]
    CaptureUnavailable,

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,

    /// Timeout waiting for GPU.
    #[error("timeout waiting for GPU")]
    Timeout,
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for HuepickError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::EmptySurface { width, height } => HuepickError::EmptySurface { width, height },
            other => HuepickError::RenderError(other.to_string()),
        }
    }
}
