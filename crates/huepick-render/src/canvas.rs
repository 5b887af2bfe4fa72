//! Drawable target owned by a widget: a window surface or an offscreen
//! texture, plus a depth buffer.

use std::cell::Cell;

use glam::Vec3;

use crate::context::GpuContext;
use crate::error::{RenderError, RenderResult};

/// Depth format used by every pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Format of offscreen (headless) canvases.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Which target the canvas is currently bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTarget {
    /// The on-screen (or offscreen presentation) target.
    #[default]
    Screen,
    /// The pick encoding target.
    Pick,
}

/// Binds the pick target for as long as it lives.
///
/// Dropping the guard rebinds [`ActiveTarget::Screen`], on every exit path.
pub struct TargetGuard<'a> {
    active: &'a Cell<ActiveTarget>,
}

impl Drop for TargetGuard<'_> {
    fn drop(&mut self) {
        self.active.set(ActiveTarget::Screen);
    }
}

enum ScreenTarget {
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

/// A widget's drawing surface.
pub struct Canvas {
    context: GpuContext,
    screen: ScreenTarget,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    depth_view: wgpu::TextureView,
    active: Cell<ActiveTarget>,
}

impl Canvas {
    /// Creates an offscreen canvas.
    pub fn headless(context: &GpuContext, width: u32, height: u32) -> RenderResult<Self> {
        check_area(width, height)?;
        let texture = create_offscreen_texture(context.device(), width, height);
        let depth_view = create_depth_view(context.device(), width, height);
        log::info!("headless canvas created ({width}x{height})");
        Ok(Self {
            context: context.clone(),
            screen: ScreenTarget::Offscreen { texture },
            format: OFFSCREEN_FORMAT,
            width,
            height,
            depth_view,
            active: Cell::new(ActiveTarget::Screen),
        })
    }

    /// Creates a canvas that presents to a window surface.
    pub fn windowed(
        context: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        check_area(width, height)?;
        let caps = surface.get_capabilities(context.adapter());
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(RenderError::SurfaceConfigurationFailed)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(context.device(), &config);

        let depth_view = create_depth_view(context.device(), width, height);
        log::info!("window canvas created ({width}x{height}, {format:?})");
        Ok(Self {
            context: context.clone(),
            screen: ScreenTarget::Surface { surface, config },
            format,
            width,
            height,
            depth_view,
            active: Cell::new(ActiveTarget::Screen),
        })
    }

    /// Reallocates the screen and depth targets. A size with no area is
    /// ignored and the previous size kept.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("ignoring resize to {width}x{height}");
            return;
        }
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;

        let device = self.context.device();
        match &mut self.screen {
            ScreenTarget::Surface { surface, config } => {
                config.width = width;
                config.height = height;
                surface.configure(device, config);
            }
            ScreenTarget::Offscreen { texture } => {
                *texture = create_offscreen_texture(device, width, height);
            }
        }
        self.depth_view = create_depth_view(device, width, height);
        log::debug!("canvas resized to {width}x{height}");
    }

    /// Clears the screen target and depth, records `draw` into one pass, then
    /// submits and presents.
    pub fn render(&self, clear: Vec3, draw: impl FnOnce(&mut wgpu::RenderPass<'_>)) -> RenderResult<()> {
        if self.active.get() != ActiveTarget::Screen {
            log::warn!("render skipped: pick target is bound");
            return Ok(());
        }

        let (frame, view) = match &self.screen {
            ScreenTarget::Surface { surface, config } => {
                let frame = match surface.get_current_texture() {
                    Ok(frame) => frame,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        log::warn!("surface lost or outdated, reconfiguring");
                        surface.configure(self.context.device(), config);
                        return Ok(());
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("surface timeout");
                        return Ok(());
                    }
                    Err(wgpu::SurfaceError::Other) => {
                        log::warn!("surface error: other");
                        return Ok(());
                    }
                };
                let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
                (Some(frame), view)
            }
            ScreenTarget::Offscreen { texture } => {
                (None, texture.create_view(&wgpu::TextureViewDescriptor::default()))
            }
        };

        let device = self.context.device();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("canvas encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("canvas pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear.x),
                            g: f64::from(clear.y),
                            b: f64::from(clear.z),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(depth_attachment(&self.depth_view)),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            draw(&mut pass);
        }
        self.context.queue().submit(std::iter::once(encoder.finish()));

        if let Some(frame) = frame {
            frame.present();
        }
        Ok(())
    }

    /// Reads back the offscreen target as tightly packed RGBA8 rows, top row
    /// first. Values are as stored, i.e. sRGB encoded.
    ///
    /// Window canvases fail with [`RenderError::CaptureUnavailable`].
    pub fn capture(&self) -> RenderResult<Vec<u8>> {
        let ScreenTarget::Offscreen { texture } = &self.screen else {
            return Err(RenderError::CaptureUnavailable);
        };

        let device = self.context.device();
        let bytes_per_row = aligned_bytes_per_row(self.width);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("capture staging buffer"),
            size: u64::from(bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("capture encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.context.queue().submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|err| RenderError::ReadbackFailed(err.to_string()))?;
        rx.recv()
            .map_err(|_| RenderError::ReadbackFailed("map callback dropped".into()))?
            .map_err(|err| RenderError::ReadbackFailed(err.to_string()))?;

        let row_bytes = self.width as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks_exact(bytes_per_row as usize) {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
        }
        buffer.unmap();
        log::debug!("captured {}x{} canvas", self.width, self.height);
        Ok(pixels)
    }

    /// Binds the pick target until the returned guard is dropped.
    pub fn bind_pick_target(&self) -> TargetGuard<'_> {
        self.active.set(ActiveTarget::Pick);
        TargetGuard { active: &self.active }
    }

    /// The currently bound target.
    pub fn active_target(&self) -> ActiveTarget {
        self.active.get()
    }

    /// The GPU context this canvas draws with.
    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    /// Color format of the screen target.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Width over height.
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Depth attachment cleared to the far plane.
pub(crate) fn depth_attachment(view: &wgpu::TextureView) -> wgpu::RenderPassDepthStencilAttachment<'_> {
    wgpu::RenderPassDepthStencilAttachment {
        view,
        depth_ops: Some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(1.0),
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    }
}

pub(crate) fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_offscreen_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen canvas"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// Row pitch of an RGBA8 copy, padded to `COPY_BYTES_PER_ROW_ALIGNMENT`.
fn aligned_bytes_per_row(width: u32) -> u32 {
    (width * 4).div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

fn check_area(width: u32, height: u32) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptySurface { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_pitch_is_aligned() {
        assert_eq!(aligned_bytes_per_row(1), 256);
        assert_eq!(aligned_bytes_per_row(64), 256);
        assert_eq!(aligned_bytes_per_row(65), 512);
        assert_eq!(aligned_bytes_per_row(300), 1280);
    }
}
