//! Embeddings: forward mappings out of color space.
//!
//! An embedding is a WGSL function body plus an optional host-side function
//! that computes the same thing. Space embeddings are injected into the vertex
//! stage as
//!
//! ```wgsl
//! fn space_embed(c: vec3<f32>, p: vec3<f32>) -> vec3<f32> { /* body */ }
//! ```
//!
//! where `c` is the domain coordinate and `p` the object-space surface
//! position. Color embeddings are injected into the fragment stage as
//! `fn color_embed(c: vec3<f32>) -> vec3<f32>`.
//!
//! The shader body and the host `forward` are two implementations of one
//! mapping. Nothing enforces that they agree; the GPU round-trip tests do.

use std::borrow::Cow;
use std::f32::consts::TAU;

use glam::Vec3;

use crate::error::{HuepickError, Result};
use crate::Coordinate;

/// Host-side forward mapping.
pub type ForwardFn = fn(Coordinate) -> Vec3;

/// A named forward mapping from a domain coordinate to a render-space
/// position (space embeddings) or a display color (color embeddings).
#[derive(Debug, Clone)]
pub struct Embedding {
    name: Cow<'static, str>,
    shader: Cow<'static, str>,
    forward: Option<ForwardFn>,
}

impl Embedding {
    /// Creates an embedding from a WGSL function body.
    pub fn new(name: impl Into<Cow<'static, str>>, shader: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            forward: None,
        }
    }

    /// Attaches the host-side equivalent of the shader body.
    #[must_use]
    pub fn with_forward(mut self, forward: ForwardFn) -> Self {
        self.forward = Some(forward);
        self
    }

    /// Returns the embedding's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the WGSL function body.
    pub fn shader(&self) -> &str {
        &self.shader
    }

    /// Whether a host-side forward function is available.
    pub fn has_forward(&self) -> bool {
        self.forward.is_some()
    }

    /// Evaluates the host-side forward mapping, if there is one.
    pub fn forward(&self, coordinate: Coordinate) -> Option<Vec3> {
        self.forward.map(|f| f(coordinate))
    }

    /// Unit cube centered at the origin.
    pub fn cube() -> Self {
        Self::new("cube", "return c - vec3<f32>(0.5);").with_forward(cube_forward)
    }

    /// Cylinder of unit height and diameter centered at the origin.
    ///
    /// `x` is the angle as a fraction of a turn, `y` the height and `z` the
    /// radius.
    pub fn cylinder() -> Self {
        Self::new(
            "cylinder",
            "let angle = c.x * 6.283185307179586;\n\
             let r = c.z * 0.5;\n\
             return vec3<f32>(cos(angle) * r, c.y - 0.5, sin(angle) * r);",
        )
        .with_forward(cylinder_forward)
    }

    /// Object-space pass-through. The position depends on the mesh, so there
    /// is no host forward.
    pub fn flat() -> Self {
        Self::new("flat", "return p;")
    }

    /// Identity color mapping: the coordinate is linear RGB.
    pub fn rgb() -> Self {
        Self::new("rgb", "return c;").with_forward(|c| c)
    }

    /// HSV with `x` = hue, `y` = value, `z` = saturation, laid out to match
    /// [`Embedding::cylinder`].
    pub fn hsv() -> Self {
        Self::new(
            "hsv",
            "let k = (vec3<f32>(5.0, 3.0, 1.0) + fract(c.x) * 6.0) % vec3<f32>(6.0);\n\
             return vec3<f32>(c.y) - c.y * c.z * clamp(min(k, vec3<f32>(4.0) - k), vec3<f32>(0.0), vec3<f32>(1.0));",
        )
        .with_forward(hsv_forward)
    }
}

fn cube_forward(c: Coordinate) -> Vec3 {
    c - Vec3::splat(0.5)
}

fn cylinder_forward(c: Coordinate) -> Vec3 {
    let angle = c.x * TAU;
    let r = c.z * 0.5;
    Vec3::new(angle.cos() * r, c.y - 0.5, angle.sin() * r)
}

fn hsv_forward(c: Coordinate) -> Vec3 {
    let h = (c.x - c.x.floor()) * 6.0;
    let channel = |n: f32| {
        let k = (n + h) % 6.0;
        c.y - c.y * c.z * k.min(4.0 - k).clamp(0.0, 1.0)
    };
    Vec3::new(channel(5.0), channel(3.0), channel(1.0))
}

/// Stock volumetric shapes for the space widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceShape {
    /// Cube-like layout ([`Embedding::cube`]).
    Cube,
    /// Cylindrical layout ([`Embedding::cylinder`]).
    Cylinder,
}

impl SpaceShape {
    /// Parses a shape name. Unknown names are a configuration error.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cube" => Ok(SpaceShape::Cube),
            "cylinder" => Ok(SpaceShape::Cylinder),
            _ => Err(HuepickError::UnsupportedShape(name.to_string())),
        }
    }

    /// Returns the stock space embedding for this shape.
    #[must_use]
    pub fn embedding(self) -> Embedding {
        match self {
            SpaceShape::Cube => Embedding::cube(),
            SpaceShape::Cylinder => Embedding::cylinder(),
        }
    }
}
