//! GPU pick engine.
//!
//! A pick renders the encoding scene into a float target, copies the one pixel
//! under the cursor into a staging buffer and decodes it. The forward mapping
//! runs on the GPU exactly as it does for the visible scene, so no host-side
//! inverse of an embedding is ever needed.

use huepick_core::{decode_pixel, PickResult};

use crate::canvas::{create_depth_view, depth_attachment, Canvas};
use crate::context::GpuContext;
use crate::error::{RenderError, RenderResult};

/// Color format of the encoding target.
pub const PICK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Staging buffer size; one row padded to `COPY_BYTES_PER_ROW_ALIGNMENT`.
const STAGING_SIZE: u64 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64;

/// Bytes per `Rgba32Float` texel.
const TEXEL_SIZE: u64 = 16;

/// Something that can be drawn in both the visible and the encoding scene.
pub trait Pickable {
    /// Records the visible material. Group 0 (camera) is already bound.
    fn draw_visible(&self, pass: &mut wgpu::RenderPass<'_>);

    /// Records the encoding material. Group 0 (camera) is already bound.
    fn draw_encoding(&self, pass: &mut wgpu::RenderPass<'_>);

    /// Tag written into the alpha channel of the encoding target.
    fn tag(&self) -> u32;
}

struct PickTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    size: (u32, u32),
}

/// Decodes the domain coordinate under a pixel.
pub struct PickEngine {
    context: GpuContext,
    target: Option<PickTarget>,
    staging_buffer: wgpu::Buffer,
}

impl PickEngine {
    /// Creates the engine. Targets are allocated on the first pick.
    pub fn new(context: &GpuContext) -> Self {
        let staging_buffer = context.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("pick staging buffer"),
            size: STAGING_SIZE,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            context: context.clone(),
            target: None,
            staging_buffer,
        }
    }

    /// Creates or recreates the pick target to match `width` x `height`.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            self.target = None;
            return;
        }
        if self.target.as_ref().is_some_and(|t| t.size == (width, height)) {
            return;
        }

        let device = self.context.device();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pick texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PICK_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = create_depth_view(device, width, height);

        log::debug!("pick target allocated ({width}x{height})");
        self.target = Some(PickTarget {
            texture,
            view,
            depth_view,
            size: (width, height),
        });
    }

    /// Picks at surface pixel `(x, y)`, y measured from the bottom.
    ///
    /// Misses, out-of-bounds pixels and readback failures all return an
    /// invalid result; failures are logged.
    #[allow(clippy::cast_precision_loss)]
    pub fn pick(
        &mut self,
        canvas: &Canvas,
        camera_bind_group: &wgpu::BindGroup,
        objects: &[&dyn Pickable],
        x: f32,
        y: f32,
    ) -> PickResult {
        let (width, height) = canvas.size();
        self.resize(width, height);

        if !(x >= 0.0 && y >= 0.0 && x < width as f32 && y < height as f32) {
            log::debug!("pick at ({x}, {y}) outside {width}x{height}");
            return PickResult::miss();
        }

        let _guard = canvas.bind_pick_target();
        match self.read_pixel(camera_bind_group, objects, x, y) {
            Ok(pixel) => {
                let result = decode_pixel(pixel);
                log::debug!("pick at ({x}, {y}): {result:?}");
                result
            }
            Err(err) => {
                log::error!("pick at ({x}, {y}) failed: {err}");
                PickResult::miss()
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn read_pixel(
        &self,
        camera_bind_group: &wgpu::BindGroup,
        objects: &[&dyn Pickable],
        x: f32,
        y: f32,
    ) -> RenderResult<[f32; 4]> {
        let target = self.target.as_ref().ok_or(RenderError::PickTargetUnavailable)?;
        let (_, height) = target.size;
        let column = x.floor() as u32;
        let row = height - 1 - y.floor() as u32;

        let mut encoder = self
            .context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pick encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pick pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(depth_attachment(&target.depth_view)),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, camera_bind_group, &[]);
            for object in objects {
                object.draw_encoding(&mut pass);
            }
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: column,
                    y: row,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        self.context.queue().submit(std::iter::once(encoder.finish()));

        let slice = self.staging_buffer.slice(..TEXEL_SIZE);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let polled = self
            .context
            .device()
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|err| match err {
                wgpu::PollError::Timeout => RenderError::Timeout,
                other => RenderError::ReadbackFailed(other.to_string()),
            })
            .and_then(|_| {
                rx.recv()
                    .map_err(|_| RenderError::ReadbackFailed("map callback dropped".into()))
            });
        // The map may still be pending; cancel it so the next copy into the
        // staging buffer is valid.
        let mapped = cancel_on_error(polled, || self.staging_buffer.unmap())?;
        // A failed map leaves the buffer unmapped.
        mapped.map_err(|err| RenderError::ReadbackFailed(err.to_string()))?;

        let pixel = {
            let data = slice.get_mapped_range();
            bytemuck::pod_read_unaligned::<[f32; 4]>(&data[..16])
        };
        self.staging_buffer.unmap();
        Ok(pixel)
    }
}

/// Runs `cancel` when a readback wait failed, then passes the result through.
fn cancel_on_error<T>(result: RenderResult<T>, cancel: impl FnOnce()) -> RenderResult<T> {
    if result.is_err() {
        cancel();
    }
    result
}
