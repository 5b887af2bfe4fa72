//! Coordinate axes and the single-axis analytic pick.

use serde::{Deserialize, Serialize};

use crate::error::{HuepickError, Result};
use crate::{Coordinate, Vec3};

/// One of the three domain channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    /// First channel.
    #[default]
    X,
    /// Second channel.
    Y,
    /// Third channel.
    Z,
}

impl Axis {
    /// All axes in channel order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Parses a channel index (0 = X, 1 = Y, 2 = Z).
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(HuepickError::UnsupportedAxis(other)),
        }
    }

    /// Channel index of this axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// The two remaining axes `(u, v)` such that `u x v` points along `self`.
    pub fn plane_axes(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// Object axis of the slab mesh that carries this channel.
    ///
    /// The Y channel runs up the canvas; X and Z run across it.
    pub fn slab_object_axis(self) -> Axis {
        match self {
            Axis::Y => Axis::Y,
            Axis::X | Axis::Z => Axis::X,
        }
    }
}

/// Computes the coordinate under pixel `(x, y)` of an axis slab that fills a
/// `width` x `height` canvas.
///
/// Only the channel for `axis` changes; the other two are taken from `current`.
/// `y` is measured from the bottom of the canvas. A canvas with no area leaves
/// `current` unchanged.
pub fn pick_channel(axis: Axis, x: f32, y: f32, width: f32, height: f32, current: Coordinate) -> Coordinate {
    if width <= 0.0 || height <= 0.0 {
        return current;
    }
    let value = match axis.slab_object_axis() {
        Axis::Y => y / height,
        _ => x / width,
    };
    let mut picked = current;
    picked[axis.index()] = value;
    picked
}
