//! huepick: interactive 3D color pickers with GPU inverse picking.
//!
//! A color model is shown as a geometric volume (a cube, a cylinder, or a
//! single-channel slab). Pointing at the rendered surface selects the color
//! that produced the pixel; the coordinate is recovered by rendering an
//! encoding pass and reading one pixel back, so embeddings never need an
//! inverse.
//!
//! # Quick Start
//!
//! ```no_run
//! use huepick::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let context = headless_context()?;
//!     let canvas = headless_canvas(&context, 256, 256)?;
//!     let config = SpaceWidgetConfig::new(Embedding::cylinder(), Embedding::hsv());
//!     let mut widget = SpaceWidget::new(canvas, config)?;
//!     widget.set_on_change(|color| println!("picked {color}"));
//!
//!     let event = PointerEvent::new(Vec2::new(128.0, 128.0), Vec2::ZERO, Buttons::PRIMARY);
//!     widget.pointer_down(&event);
//!     widget.render()?;
//!     Ok(())
//! }
//! ```
//!
//! # Widgets
//!
//! - [`AxisWidget`] - A slab sweeping one channel, picked analytically
//! - [`SpaceWidget`] - A sliceable volume with an orbit camera, picked on the GPU

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod axis_widget;
mod headless;
pub mod input;
mod space_widget;
mod widget;

// Re-export core types
pub use huepick_core::{
    axis::{pick_channel, Axis},
    embedding::{Embedding, ForwardFn, SpaceShape},
    error::{HuepickError, Result},
    input::{Buttons, PointerEvent},
    options::WidgetOptions,
    orbit::{CameraState, OrbitController, OrbitOptions},
    pick::{ObjectKind, PickResult},
    selection::Selection,
    slice::Slice,
    Coordinate, Mat4, Vec2, Vec3, Vec4,
};

// Re-export render types
pub use huepick_render::{ActiveTarget, Canvas, GpuContext, RenderError};

pub use axis_widget::{AxisWidget, AxisWidgetConfig};
pub use headless::{headless_canvas, headless_context};
pub use input::PointerTracker;
pub use space_widget::{SpaceWidget, SpaceWidgetConfig};
pub use widget::{ChangeCallback, ColorWidget, WidgetEvent};

/// Installs `env_logger` as the `log` backend. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
