//! Core abstractions for huepick.
//!
//! This crate holds everything about a color picker that does not need a GPU:
//! - [`Embedding`] forward mappings out of color space
//! - [`PickResult`] and the pixel encoding shared with the pick pass
//! - [`OrbitController`] for the 3D space widget's camera
//! - [`Selection`] state machine and slice/axis transforms
//! - Pointer input types and widget options

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have several boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod axis;
pub mod embedding;
pub mod error;
pub mod input;
pub mod options;
pub mod orbit;
pub mod pick;
pub mod selection;
pub mod slice;

pub use axis::{pick_channel, Axis};
pub use embedding::{Embedding, ForwardFn, SpaceShape};
pub use error::{HuepickError, Result};
pub use input::{Buttons, PointerEvent};
pub use options::WidgetOptions;
pub use orbit::{CameraState, OrbitController, OrbitOptions};
pub use pick::{decode_pixel, validate_tag, ObjectKind, PickResult, MAX_TAG};
pub use selection::Selection;
pub use slice::{axis_slab_matrix, base_embed_matrix, Slice};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// A point in a color model's domain, each component conventionally in `[0, 1]`.
///
/// Components are never clamped implicitly.
pub type Coordinate = Vec3;
