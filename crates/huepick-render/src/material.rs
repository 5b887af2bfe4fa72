//! Embedded objects: a mesh drawn through a space embedding, with a visible
//! material and (when pickable) an encoding material.
//!
//! Both materials read the same object uniform buffer, so a new embedding
//! matrix reaches the visible scene and the pick scene in one write.

use glam::Mat4;
use huepick_core::Embedding;

use crate::buffer::{uniform_bind_group_layout, UniformBuffer};
use crate::canvas::DEPTH_FORMAT;
use crate::context::GpuContext;
use crate::error::RenderResult;
use crate::mesh::{CpuMesh, GpuMesh, VERTEX_LAYOUT};
use crate::pick::{Pickable, PICK_FORMAT};
use crate::shader::{FragmentStage, ShaderBuilder};

/// Object flag: show out-of-gamut display colors as neutral gray.
pub const FLAG_CLIP_OUT_OF_GAMUT: u32 = 1;

/// GPU-side object data (bind group 1).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    /// Render-space placement applied after the space embedding.
    pub model: [[f32; 4]; 4],
    /// Mesh position to domain coordinate.
    pub embed: [[f32; 4]; 4],
    /// Pick tag, 0 when not pickable.
    pub tag: u32,
    /// `FLAG_*` bits.
    pub flags: u32,
    /// Padding to 16-byte alignment.
    pub _padding: [u32; 2],
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            embed: Mat4::IDENTITY.to_cols_array_2d(),
            tag: 0,
            flags: 0,
            _padding: [0; 2],
        }
    }
}

/// Bind group and pipeline layouts shared by a widget's objects.
pub struct SceneLayouts {
    /// Group 0: camera uniforms.
    pub camera: wgpu::BindGroupLayout,
    /// Group 1: object uniforms.
    pub object: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
}

impl SceneLayouts {
    /// Creates the layouts.
    pub fn new(device: &wgpu::Device) -> Self {
        let camera = uniform_bind_group_layout(device, wgpu::ShaderStages::VERTEX, "camera layout");
        let object = uniform_bind_group_layout(
            device,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            "object layout",
        );
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("object pipeline layout"),
            bind_group_layouts: &[&camera, &object],
            push_constant_ranges: &[],
        });
        Self {
            camera,
            object,
            pipeline_layout,
        }
    }
}

/// Creates an object pipeline.
///
/// `depth_bias` pulls the object toward the camera so it wins over coplanar
/// geometry.
pub fn create_object_pipeline(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    module: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    depth_bias: bool,
    label: &str,
) -> wgpu::RenderPipeline {
    let bias = if depth_bias {
        wgpu::DepthBiasState {
            constant: -4,
            slope_scale: -1.0,
            clamp: 0.0,
        }
    } else {
        wgpu::DepthBiasState::default()
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layouts.pipeline_layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[VERTEX_LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None, // Embeddings may flip winding
            ..wgpu::PrimitiveState::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias,
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// How to build an [`EmbeddedObject`].
pub struct ObjectDescriptor<'a> {
    /// Debug label.
    pub label: &'a str,
    /// Object-space mesh.
    pub mesh: &'a CpuMesh,
    /// Vertex-stage embedding.
    pub space_embedding: &'a Embedding,
    /// Fragment-stage embedding for [`FragmentStage::Visible`].
    pub color_embedding: &'a Embedding,
    /// Visible fragment stage ([`FragmentStage::Visible`] or [`FragmentStage::Marker`]).
    pub fragment: FragmentStage,
    /// Pick tag. `None` leaves the object out of the pick scene.
    pub tag: Option<u32>,
    /// Whether to pull the object in front of coplanar geometry.
    pub depth_bias: bool,
}

/// A mesh drawn through an embedding, optionally pickable.
pub struct EmbeddedObject {
    mesh: GpuMesh,
    uniforms: ObjectUniforms,
    uniform_buffer: UniformBuffer<ObjectUniforms>,
    bind_group: wgpu::BindGroup,
    visible_pipeline: wgpu::RenderPipeline,
    encoding_pipeline: Option<wgpu::RenderPipeline>,
    visible: bool,
}

impl EmbeddedObject {
    /// Uploads the mesh and builds the pipelines.
    pub fn new(
        context: &GpuContext,
        layouts: &SceneLayouts,
        screen_format: wgpu::TextureFormat,
        desc: &ObjectDescriptor<'_>,
    ) -> RenderResult<Self> {
        let device = context.device();
        let label = desc.label;

        let visible_module = ShaderBuilder::new(desc.fragment)
            .with_space_embedding(desc.space_embedding)
            .with_color_embedding(desc.color_embedding)
            .with_label(format!("{label} visible shader"))
            .build_module(device)?;
        let visible_pipeline = create_object_pipeline(
            device,
            layouts,
            &visible_module,
            screen_format,
            desc.depth_bias,
            &format!("{label} visible pipeline"),
        );

        let encoding_pipeline = match desc.tag {
            Some(_) => {
                let module = ShaderBuilder::new(FragmentStage::Encoding)
                    .with_space_embedding(desc.space_embedding)
                    .with_label(format!("{label} encoding shader"))
                    .build_module(device)?;
                Some(create_object_pipeline(
                    device,
                    layouts,
                    &module,
                    PICK_FORMAT,
                    desc.depth_bias,
                    &format!("{label} encoding pipeline"),
                ))
            }
            None => None,
        };

        let uniforms = ObjectUniforms {
            tag: desc.tag.unwrap_or(0),
            ..ObjectUniforms::default()
        };
        let uniform_buffer = UniformBuffer::new(device, &uniforms, &format!("{label} uniforms"));
        let bind_group =
            uniform_buffer.bind_group(device, &layouts.object, &format!("{label} bind group"));

        Ok(Self {
            mesh: GpuMesh::upload(device, desc.mesh, label),
            uniforms,
            uniform_buffer,
            bind_group,
            visible_pipeline,
            encoding_pipeline,
            visible: true,
        })
    }

    /// Sets the render-space placement.
    pub fn set_model(&mut self, queue: &wgpu::Queue, model: Mat4) {
        self.uniforms.model = model.to_cols_array_2d();
        self.uniform_buffer.write(queue, &self.uniforms);
    }

    /// Sets the mesh-to-domain matrix for both materials.
    pub fn set_embed_matrix(&mut self, queue: &wgpu::Queue, embed: Mat4) {
        self.uniforms.embed = embed.to_cols_array_2d();
        self.uniform_buffer.write(queue, &self.uniforms);
    }

    /// Replaces the `FLAG_*` bits.
    pub fn set_flags(&mut self, queue: &wgpu::Queue, flags: u32) {
        self.uniforms.flags = flags;
        self.uniform_buffer.write(queue, &self.uniforms);
    }

    /// Shows or hides the object in both scenes.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Pickable for EmbeddedObject {
    fn draw_visible(&self, pass: &mut wgpu::RenderPass<'_>) {
        if !self.visible {
            return;
        }
        pass.set_pipeline(&self.visible_pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.draw(pass);
    }

    fn draw_encoding(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(pipeline) = self.encoding_pipeline.as_ref().filter(|_| self.visible) else {
            return;
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.draw(pass);
    }

    fn tag(&self) -> u32 {
        self.uniforms.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_uniforms_layout() {
        // Two mat4x4 plus four u32, as declared in object.wgsl.
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 144);
        assert_eq!(std::mem::size_of::<ObjectUniforms>() % 16, 0);
    }
}
