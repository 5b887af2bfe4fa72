//! Error types for huepick.

use thiserror::Error;

/// The main error type for huepick operations.
#[derive(Error, Debug)]
pub enum HuepickError {
    /// An axis index outside `0..=2` was requested.
    #[error("unsupported axis {0} (expected 0 = X, 1 = Y or 2 = Z)")]
    UnsupportedAxis(u32),

    /// A space shape name that has no stock embedding.
    #[error("unsupported shape '{0}'")]
    UnsupportedShape(String),

    /// Tag 0 is reserved for background, and tags must survive an `f32` round trip.
    #[error("invalid pick tag {0}: must be in 1..{max}", max = crate::pick::MAX_TAG)]
    InvalidTag(u32),

    /// The drawable surface has no area.
    #[error("surface has no area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    /// A configuration value outside its valid range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// An operation needs the host forward of an embedding that has none.
    #[error("embedding '{0}' has no host forward")]
    MissingForward(String),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// JSON options parse error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for huepick operations.
pub type Result<T> = std::result::Result<T, HuepickError>;
