//! Shared GPU device and queue.

use std::sync::Arc;

use crate::error::{RenderError, RenderResult};

/// Reference-counted handle to the wgpu adapter, device and queue.
///
/// Widgets hold clones of one context; the device lives until the last clone
/// is dropped.
#[derive(Clone)]
pub struct GpuContext {
    adapter: Arc<wgpu::Adapter>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Creates a context with no surface, for offscreen canvases and tests.
    pub async fn new_headless() -> RenderResult<Self> {
        let instance = create_instance();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;
        Self::from_adapter(adapter, "huepick device (headless)").await
    }

    /// Creates a context able to present to `window`, returning its surface.
    pub async fn new_windowed(
        window: Arc<winit::window::Window>,
    ) -> RenderResult<(Self, wgpu::Surface<'static>)> {
        let instance = create_instance();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;
        let context = Self::from_adapter(adapter, "huepick device").await?;
        Ok((context, surface))
    }

    async fn from_adapter(adapter: wgpu::Adapter, label: &str) -> RenderResult<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some(label),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        let info = adapter.get_info();
        log::info!("GPU context created on {} ({:?})", info.name, info.backend);

        Ok(Self {
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// The adapter the device was created on.
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// The device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..wgpu::InstanceDescriptor::default()
    })
}
