//! Camera and view management.

use glam::{Mat4, Vec2, Vec3};

use crate::buffer::UniformBuffer;

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProjectionMode {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Orthographic projection with the given half extents.
    Orthographic {
        /// Half width and half height of the view volume.
        half_extents: Vec2,
    },
}

/// A camera for viewing a widget's scene.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians (perspective only).
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Projection mode.
    pub projection_mode: ProjectionMode,
}

impl Camera {
    /// Creates a perspective camera.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 40.0_f32.to_radians(),
            aspect_ratio,
            near: 0.01,
            far: 100.0,
            projection_mode: ProjectionMode::Perspective,
        }
    }

    /// Creates an orthographic camera whose view volume spans
    /// `[-half_extents, half_extents]` in view space.
    #[must_use]
    pub fn orthographic(half_extents: Vec2) -> Self {
        Self {
            projection_mode: ProjectionMode::Orthographic { half_extents },
            near: 0.01,
            far: 10.0,
            ..Self::new(half_extents.x / half_extents.y)
        }
    }

    /// Moves the camera.
    pub fn look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.position = position;
        self.target = target;
        self.up = up;
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Sets the field of view in degrees.
    pub fn set_fov_degrees(&mut self, degrees: f32) {
        self.fov = degrees.to_radians().clamp(0.1, std::f32::consts::PI - 0.1);
    }

    /// Returns the field of view in degrees.
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => {
                Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
            }
            ProjectionMode::Orthographic { half_extents } => Mat4::orthographic_rh(
                -half_extents.x,
                half_extents.x,
                -half_extents.y,
                half_extents.y,
                self.near,
                self.far,
            ),
        }
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world point to surface pixels (origin bottom-left).
    ///
    /// Returns `None` for points behind the camera.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn project_to_pixel(&self, world: Vec3, width: u32, height: u32) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * width as f32,
            (ndc.y + 1.0) * 0.5 * height as f32,
        ))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// GPU-side camera data (bind group 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Uniform buffer and bind group holding one camera.
pub struct CameraBinding {
    buffer: UniformBuffer<CameraUniforms>,
    bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    /// Creates the binding against the camera bind group layout.
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let buffer = UniformBuffer::new(device, &CameraUniforms::default(), "camera uniforms");
        let bind_group = buffer.bind_group(device, layout, "camera bind group");
        Self { buffer, bind_group }
    }

    /// Uploads the camera's current view-projection matrix.
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera) {
        self.buffer.write(
            queue,
            &CameraUniforms {
                view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            },
        );
    }

    /// The bind group to set at group 0.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.projection_mode, ProjectionMode::Perspective);
        assert!((camera.fov_degrees() - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_project_target_to_center() {
        let camera = Camera::new(2.0);
        let pixel = camera.project_to_pixel(Vec3::ZERO, 200, 100).unwrap();
        assert!((pixel - Vec2::new(100.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn test_project_behind_camera() {
        let camera = Camera::new(1.0);
        assert_eq!(camera.project_to_pixel(Vec3::new(0.0, 0.0, 10.0), 100, 100), None);
    }

    #[test]
    fn test_orthographic_maps_extents_to_corners() {
        let mut camera = Camera::orthographic(Vec2::new(2.0, 1.0));
        camera.look_at(Vec3::Z, Vec3::ZERO, Vec3::Y);
        let corner = camera.project_to_pixel(Vec3::new(2.0, 1.0, 0.0), 400, 200).unwrap();
        assert!((corner - Vec2::new(400.0, 200.0)).length() < 1e-3);
        let origin = camera.project_to_pixel(Vec3::new(-2.0, -1.0, 0.0), 400, 200).unwrap();
        assert!(origin.length() < 1e-3);
    }

    #[test]
    fn test_set_fov_clamping() {
        let mut camera = Camera::default();
        camera.set_fov_degrees(0.0);
        assert!((camera.fov - 0.1).abs() < 1e-6);
    }
}
