//! Offscreen widgets for tests and batch use.
//!
//! Blocks on the async wgpu setup so callers need no executor.

use huepick_core::Result;
use huepick_render::{Canvas, GpuContext};
use pollster::FutureExt;

/// Creates a GPU context without a window.
pub fn headless_context() -> Result<GpuContext> {
    Ok(GpuContext::new_headless().block_on()?)
}

/// Creates an offscreen canvas of the given size.
pub fn headless_canvas(context: &GpuContext, width: u32, height: u32) -> Result<Canvas> {
    Ok(Canvas::headless(context, width, height)?)
}
