//! Spherical orbit camera controller for the space widget.

use std::f32::consts::FRAC_PI_4;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{HuepickError, Result};

/// Radius floor used when the configured one is unusable.
const DEFAULT_MIN_RADIUS: f32 = 0.1;

/// Tunables and initial pose for an [`OrbitController`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitOptions {
    /// Initial elevation angle in radians.
    pub theta: f32,
    /// Initial azimuth angle in radians.
    pub phi: f32,
    /// Initial distance from `look_at`.
    pub radius: f32,
    /// Orbit center.
    pub look_at: Vec3,
    /// Radians per unit of pointer movement.
    pub rotate_speed: f32,
    /// Radius change per unit of zoom input.
    pub zoom_speed: f32,
    /// Lower bound for the radius.
    pub min_radius: f32,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            theta: 0.0,
            phi: 1.0,
            radius: 4.0,
            look_at: Vec3::ZERO,
            rotate_speed: 0.01,
            zoom_speed: 0.04,
            min_radius: DEFAULT_MIN_RADIUS,
        }
    }
}

impl OrbitOptions {
    /// Checks that the radius and its floor are finite and the floor is positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_radius.is_finite() && self.min_radius > 0.0) {
            return Err(HuepickError::InvalidOption(format!(
                "orbit.min_radius must be positive and finite, got {}",
                self.min_radius
            )));
        }
        if !self.radius.is_finite() {
            return Err(HuepickError::InvalidOption(format!(
                "orbit.radius must be finite, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Orbit camera pose in spherical coordinates around `look_at`.
///
/// Angles are never wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Elevation angle in radians.
    pub theta: f32,
    /// Azimuth angle in radians.
    pub phi: f32,
    /// Distance from `look_at`, always at least the configured minimum.
    pub radius: f32,
    /// Orbit center.
    pub look_at: Vec3,
}

/// Converts pointer deltas into an orbiting camera pose.
#[derive(Debug, Clone)]
pub struct OrbitController {
    state: CameraState,
    rotate_speed: f32,
    zoom_speed: f32,
    min_radius: f32,
    position: Vec3,
    up: Vec3,
}

impl OrbitController {
    /// Creates a controller. The pose is valid immediately.
    ///
    /// A non-positive or non-finite `min_radius` falls back to the default
    /// floor, so the radius always stays positive.
    pub fn new(options: &OrbitOptions) -> Self {
        let min_radius = if options.min_radius.is_finite() && options.min_radius > 0.0 {
            options.min_radius
        } else {
            log::warn!(
                "orbit min_radius {} is not positive, using {DEFAULT_MIN_RADIUS}",
                options.min_radius
            );
            DEFAULT_MIN_RADIUS
        };
        let mut controller = Self {
            state: CameraState {
                theta: options.theta,
                phi: options.phi,
                radius: options.radius,
                look_at: options.look_at,
            },
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
            min_radius,
            position: Vec3::ZERO,
            up: Vec3::Y,
        };
        controller.on_move(Vec3::ZERO);
        controller
    }

    /// Applies a movement: `x` turns the azimuth, `y` the elevation, `z` zooms.
    pub fn on_move(&mut self, delta: Vec3) {
        let state = &mut self.state;
        state.theta += delta.y * self.rotate_speed;
        state.phi += delta.x * self.rotate_speed;
        state.radius += delta.z * self.zoom_speed;
        state.radius = state.radius.max(self.min_radius);

        let (sin_theta, cos_theta) = state.theta.sin_cos();
        let (sin_phi, cos_phi) = state.phi.sin_cos();
        let direction = Vec3::new(cos_theta * cos_phi, sin_theta, cos_theta * sin_phi).normalize();
        self.position = state.look_at + direction * state.radius;

        // Degenerates near the poles; kept as-is for a familiar feel.
        self.up = Vec3::new(-cos_phi, (state.theta - FRAC_PI_4).cos(), -sin_phi).normalize();
        log::trace!(
            "orbit: theta={:.3} phi={:.3} radius={:.3}",
            state.theta,
            state.phi,
            state.radius
        );
    }

    /// Current spherical pose.
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Camera eye position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Camera up vector.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Orbit center.
    pub fn look_at(&self) -> Vec3 {
        self.state.look_at
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(&OrbitOptions::default())
    }
}
