//! Embedding matrices that map mesh positions to domain coordinates.
//!
//! Every object carries an `embed` matrix; the vertex stage computes the domain
//! coordinate as `embed * position`. Slicing and the axis slab are expressed
//! purely through these matrices, so the visible and encoding materials of an
//! object stay in agreement as long as they share one matrix.

use glam::{Mat4, Vec3, Vec4};

use crate::axis::Axis;
use crate::Coordinate;

/// Maps the unit box mesh `[-0.5, 0.5]^3` onto the domain cube `[0, 1]^3`.
pub fn base_embed_matrix() -> Mat4 {
    Mat4::from_translation(Vec3::splat(0.5))
}

/// A cut through the volume perpendicular to one axis.
///
/// The volume keeps the part of the domain with `c[axis] <= value`; the
/// cross-section plane sits at `c[axis] = value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    axis: Axis,
    value: f32,
}

impl Slice {
    /// Creates a slice, clamping `value` into `[0, 1]`.
    pub fn new(axis: Axis, value: f32) -> Self {
        let mut slice = Self { axis, value: 1.0 };
        slice.set_value(value);
        slice
    }

    /// The cut axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The cut position in `[0, 1]`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Moves the cut, clamping into `[0, 1]`. NaN leaves the cut unchanged.
    pub fn set_value(&mut self, value: f32) {
        if value.is_nan() {
            log::warn!("ignoring NaN slice value");
            return;
        }
        self.value = value.clamp(0.0, 1.0);
    }

    /// Embedding matrix of the volume: `scale(axis: value) * base`.
    ///
    /// The translation term of the slice transform is always zero: the cut
    /// keeps the `axis = 0` face fixed and shrinks the volume towards it, so
    /// the exposed cap sits at `axis = value`.
    pub fn volume_matrix(&self) -> Mat4 {
        let mut scale = Vec3::ONE;
        scale[self.axis.index()] = self.value;
        Mat4::from_scale(scale) * base_embed_matrix()
    }

    /// Embedding matrix of the cross-section plane.
    ///
    /// The plane mesh spans `[-0.5, 0.5]^2` in object XY; object X runs along
    /// the first plane axis and object Y along the second.
    pub fn cross_section_matrix(&self) -> Mat4 {
        let (u, v) = self.axis.plane_axes();
        let (u, v) = (u.unit(), v.unit());
        let offset = 0.5 * u + 0.5 * v + self.value * self.axis.unit();
        Mat4::from_cols(u.extend(0.0), v.extend(0.0), Vec4::ZERO, offset.extend(1.0))
    }
}

impl Default for Slice {
    fn default() -> Self {
        Self::new(Axis::X, 1.0)
    }
}

/// Embedding matrix of an axis slab.
///
/// The slab is the plane mesh; its object axis for `axis` (see
/// [`Axis::slab_object_axis`]) runs the channel over `[0, 1]` while the other
/// two channels stay at `color`.
pub fn axis_slab_matrix(axis: Axis, color: Coordinate) -> Mat4 {
    let channel = axis.unit();
    let mut offset = color;
    offset[axis.index()] = 0.5;
    let mut cols = [Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, offset.extend(1.0)];
    cols[axis.slab_object_axis().index()] = channel.extend(0.0);
    Mat4::from_cols(cols[0], cols[1], cols[2], cols[3])
}
