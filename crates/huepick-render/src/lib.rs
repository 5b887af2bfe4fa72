//! Rendering backend for huepick.
//!
//! This crate provides the wgpu side of a color widget:
//! - [`GpuContext`] and [`Canvas`] (window surface or offscreen target)
//! - Mesh generation and upload
//! - Shader composition from [`huepick_core::Embedding`]s (WGSL)
//! - [`EmbeddedObject`]s with visible and encoding materials
//! - The [`PickEngine`] that inverts an embedding by reading back one pixel

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod camera;
pub mod canvas;
pub mod context;
pub mod error;
pub mod material;
pub mod mesh;
pub mod pick;
pub mod shader;

pub use camera::{Camera, CameraBinding, CameraUniforms, ProjectionMode};
pub use canvas::{ActiveTarget, Canvas, TargetGuard, DEPTH_FORMAT, OFFSCREEN_FORMAT};
pub use context::GpuContext;
pub use error::{RenderError, RenderResult};
pub use material::{
    create_object_pipeline, EmbeddedObject, ObjectDescriptor, ObjectUniforms, SceneLayouts,
    FLAG_CLIP_OUT_OF_GAMUT,
};
pub use mesh::{CpuMesh, GpuMesh};
pub use pick::{PickEngine, Pickable, PICK_FORMAT};
pub use shader::{FragmentStage, ShaderBuilder};
