//! Interactive HSV cylinder picker.
//!
//! Hover to preview, drag with the left button to select and orbit, scroll to
//! zoom. Up/Down move the slice; C toggles between the cylinder and the cube.
//!
//! Run with `RUST_LOG=info cargo run --example picker_demo`.

use std::sync::Arc;

use huepick::*;
use pollster::FutureExt;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const SLICE_STEP: f32 = 0.05;

#[derive(Default)]
struct Demo {
    window: Option<Arc<Window>>,
    widget: Option<SpaceWidget>,
    tracker: PointerTracker,
    shape: Option<SpaceShape>,
}

impl Demo {
    fn build_widget(&mut self, shape: SpaceShape) -> Result<()> {
        let Some(window) = self.window.clone() else {
            return Ok(());
        };
        let size = window.inner_size();
        let (context, surface) = GpuContext::new_windowed(window).block_on()?;
        let canvas = Canvas::windowed(&context, surface, size.width.max(1), size.height.max(1))?;

        let mut config = SpaceWidgetConfig::new(shape.embedding(), Embedding::hsv());
        config.initial = Vec3::new(0.0, 1.0, 1.0);
        config.options.clip_out_of_gamut = true;
        let mut widget = SpaceWidget::new(canvas, config)?;
        widget.set_on_change(|color| log::info!("color: {color}"));

        self.tracker = PointerTracker::new(size.height);
        self.widget = Some(widget);
        self.shape = Some(shape);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::ArrowUp | KeyCode::ArrowDown => {
                if let Some(widget) = self.widget.as_mut() {
                    let step = if code == KeyCode::ArrowUp { SLICE_STEP } else { -SLICE_STEP };
                    widget.set_slice(widget.slice().value() + step);
                }
            }
            KeyCode::KeyC => {
                let next = match self.shape {
                    Some(SpaceShape::Cylinder) => SpaceShape::Cube,
                    _ => SpaceShape::Cylinder,
                };
                let color = self.widget.as_ref().map(ColorWidget::committed_color);
                // Release the old surface before creating a new one on the window.
                self.widget = None;
                if let Err(e) = self.build_widget(next) {
                    log::error!("failed to rebuild widget: {e}");
                    return;
                }
                if let (Some(widget), Some(color)) = (self.widget.as_mut(), color) {
                    widget.set_color(color);
                }
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for Demo {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("huepick")
            .with_inner_size(LogicalSize::new(640, 640));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window);

        if let Err(e) = self.build_widget(SpaceShape::Cylinder) {
            log::error!("failed to create widget: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                if let Some(widget) = self.widget.as_mut() {
                    if let Err(e) = widget.render() {
                        log::error!("render failed: {e}");
                        event_loop.exit();
                    }
                }
                return;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(*code),
            _ => {}
        }

        if let (Some(widget_event), Some(widget)) = (self.tracker.translate(&event), self.widget.as_mut()) {
            widget.handle(&widget_event);
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    init_logging();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("failed to create event loop: {e}");
            return;
        }
    };
    let mut demo = Demo::default();
    if let Err(e) = event_loop.run_app(&mut demo) {
        log::error!("event loop error: {e}");
    }
}
