//! Triangle meshes: CPU generation and GPU upload.
//!
//! Meshes carry positions only. Everything else about a vertex is derived in
//! the vertex stage from the object's embedding matrix.

use std::f32::consts::{PI, TAU};

use huepick_core::Axis;

use crate::buffer::{create_index_buffer, create_vertex_buffer};

/// Vertex stride in bytes (`vec3<f32>`).
pub const VERTEX_STRIDE: u64 = 12;

/// Vertex layout shared by every pipeline.
pub const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: VERTEX_STRIDE,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    }],
};

/// An indexed triangle list in object space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuMesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl CpuMesh {
    /// The box `[-0.5, 0.5]^3`, each face subdivided.
    ///
    /// `segments[i]` is the number of cells along axis `i` on every face that
    /// spans that axis.
    pub fn unit_box(segments: [u32; 3]) -> Self {
        let mut mesh = CpuMesh::default();
        for normal in Axis::ALL {
            let (u, v) = normal.plane_axes();
            let (su, sv) = (segments[u.index()].max(1), segments[v.index()].max(1));
            for side in [-0.5, 0.5] {
                mesh.push_grid(su, sv, |a, b| {
                    let mut p = [0.0; 3];
                    p[normal.index()] = side;
                    p[u.index()] = a - 0.5;
                    p[v.index()] = b - 0.5;
                    p
                });
            }
        }
        mesh
    }

    /// The square `[-0.5, 0.5]^2` in the object XY plane.
    pub fn plane(segments_x: u32, segments_y: u32) -> Self {
        let mut mesh = CpuMesh::default();
        mesh.push_grid(segments_x.max(1), segments_y.max(1), |a, b| [a - 0.5, b - 0.5, 0.0]);
        mesh
    }

    /// A UV sphere centered at the origin.
    pub fn sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> Self {
        let mut mesh = CpuMesh::default();
        mesh.push_grid(longitude_segments.max(3), latitude_segments.max(2), |a, b| {
            let (sin_lon, cos_lon) = (a * TAU).sin_cos();
            let (sin_lat, cos_lat) = (b * PI).sin_cos();
            [radius * sin_lat * cos_lon, -radius * cos_lat, radius * sin_lat * sin_lon]
        });
        mesh
    }

    /// Appends a `cols` x `rows` grid; `position` receives grid parameters
    /// in `[0, 1]^2`.
    #[allow(clippy::cast_precision_loss)]
    fn push_grid(&mut self, cols: u32, rows: u32, position: impl Fn(f32, f32) -> [f32; 3]) {
        let base = u32::try_from(self.positions.len()).unwrap_or(u32::MAX);
        for j in 0..=rows {
            for i in 0..=cols {
                self.positions.push(position(i as f32 / cols as f32, j as f32 / rows as f32));
            }
        }
        let stride = cols + 1;
        for j in 0..rows {
            for i in 0..cols {
                let a = base + j * stride + i;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                self.indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// A mesh uploaded to the GPU.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    /// Uploads a CPU mesh.
    pub fn upload(device: &wgpu::Device, mesh: &CpuMesh, label: &str) -> Self {
        let vertex_buffer = create_vertex_buffer(device, &mesh.positions, &format!("{label} vertices"));
        let index_buffer = create_index_buffer(device, &mesh.indices, &format!("{label} indices"));
        Self {
            vertex_buffer,
            index_buffer,
            index_count: u32::try_from(mesh.indices.len()).unwrap_or(u32::MAX),
        }
    }

    /// Binds the buffers and issues the draw.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds(mesh: &CpuMesh) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in &mesh.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        (min, max)
    }

    #[test]
    fn test_unit_box_extent_and_counts() {
        let mesh = CpuMesh::unit_box([4, 2, 2]);
        assert_eq!(bounds(&mesh), ([-0.5; 3], [0.5; 3]));
        // X faces: 2x2 cells, Y faces: 2x4, Z faces: 4x2.
        let cells = 2 * (2 * 2 + 2 * 4 + 4 * 2);
        assert_eq!(mesh.indices.len(), cells * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_plane_is_flat() {
        let mesh = CpuMesh::plane(3, 5);
        assert_eq!(mesh.vertex_count(), 4 * 6);
        assert!(mesh.positions.iter().all(|p| p[2] == 0.0));
        assert_eq!(bounds(&mesh), ([-0.5, -0.5, 0.0], [0.5, 0.5, 0.0]));
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = CpuMesh::sphere(0.25, 16, 8);
        for p in &mesh.positions {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 0.25).abs() < 1e-5);
        }
    }

    proptest! {
        #[test]
        fn prop_box_indices_in_range(x in 0u32..12, y in 0u32..12, z in 0u32..12) {
            let mesh = CpuMesh::unit_box([x, y, z]);
            let (x, y, z) = (x.max(1) as usize, y.max(1) as usize, z.max(1) as usize);
            prop_assert_eq!(mesh.indices.len(), 12 * (y * z + z * x + x * y));
            prop_assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }
}
