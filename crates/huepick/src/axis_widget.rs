//! Single-channel slab picker.
//!
//! The slab fills the canvas, so the channel under the cursor is a linear
//! function of the pixel and no pick pass is needed.

use glam::{Mat4, Vec2, Vec3};
use huepick_core::{
    axis_slab_matrix, pick_channel, Axis, Coordinate, Embedding, PointerEvent, Result, Selection,
    WidgetOptions,
};
use huepick_render::{
    Camera, CameraBinding, Canvas, CpuMesh, EmbeddedObject, FragmentStage, ObjectDescriptor,
    Pickable, ProjectionMode, SceneLayouts,
};

use crate::widget::{ChangeCallback, ColorWidget};

/// Construction parameters for an [`AxisWidget`].
#[derive(Debug, Clone)]
pub struct AxisWidgetConfig {
    /// Channel the slab controls.
    pub axis: Axis,
    /// Initial selection.
    pub initial: Coordinate,
    /// Display color mapping.
    pub color_embedding: Embedding,
    /// Shared widget options.
    pub options: WidgetOptions,
}

impl AxisWidgetConfig {
    /// Config with a black initial color and default options.
    pub fn new(axis: Axis, color_embedding: Embedding) -> Self {
        Self {
            axis,
            initial: Coordinate::ZERO,
            color_embedding,
            options: WidgetOptions::default(),
        }
    }
}

/// A slab that sweeps one channel while the other two stay fixed.
pub struct AxisWidget {
    canvas: Canvas,
    camera: Camera,
    camera_binding: CameraBinding,
    slab: EmbeddedObject,
    marker: EmbeddedObject,
    axis: Axis,
    selection: Selection,
    input: Coordinate,
    options: WidgetOptions,
    on_change: Option<ChangeCallback>,
}

impl AxisWidget {
    /// Creates the widget on `canvas`.
    pub fn new(canvas: Canvas, config: AxisWidgetConfig) -> Result<Self> {
        config.options.validate()?;
        let context = canvas.context().clone();
        let device = context.device();
        let layouts = SceneLayouts::new(device);
        let flat = Embedding::flat();

        let slab = EmbeddedObject::new(
            &context,
            &layouts,
            canvas.format(),
            &ObjectDescriptor {
                label: "axis slab",
                mesh: &CpuMesh::plane(1, 1),
                space_embedding: &flat,
                color_embedding: &config.color_embedding,
                fragment: FragmentStage::Visible,
                tag: None,
                depth_bias: false,
            },
        )?;
        let marker = EmbeddedObject::new(
            &context,
            &layouts,
            canvas.format(),
            &ObjectDescriptor {
                label: "axis marker",
                mesh: &CpuMesh::sphere(config.options.cursor_radius * 0.5, 8, 8),
                space_embedding: &flat,
                color_embedding: &config.color_embedding,
                fragment: FragmentStage::Marker,
                tag: None,
                depth_bias: false,
            },
        )?;

        let mut camera = Camera::orthographic(slab_half_extents(canvas.aspect_ratio()));
        camera.look_at(Vec3::Z, Vec3::ZERO, Vec3::Y);
        let camera_binding = CameraBinding::new(device, &layouts.camera);

        log::info!(
            "axis widget created ({:?}, {}, {}x{})",
            config.axis,
            config.color_embedding.name(),
            canvas.width(),
            canvas.height()
        );

        let mut widget = Self {
            canvas,
            camera,
            camera_binding,
            slab,
            marker,
            axis: config.axis,
            selection: Selection::new(config.initial),
            input: config.initial,
            options: config.options,
            on_change: None,
        };
        widget.update_layout();
        widget.update_visuals();
        Ok(widget)
    }

    /// Registers the change callback.
    pub fn set_on_change(&mut self, callback: impl FnMut(Coordinate) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// The channel this slab controls.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The widget's canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Analytic pick at surface pixel `(x, y)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn pick(&self, x: f32, y: f32) -> Coordinate {
        let (width, height) = self.canvas.size();
        pick_channel(self.axis, x, y, width as f32, height as f32, self.selection.pending())
    }

    fn select(&mut self, event: &PointerEvent) {
        let picked = self.pick(event.position.x, event.position.y);
        if let Some(color) = self.selection.apply(Some(picked), event.buttons.is_selecting()) {
            self.input = color;
            self.update_visuals();
            if let Some(callback) = self.on_change.as_mut() {
                callback(color);
            }
        }
    }

    /// Projection and slab size for the current aspect ratio.
    fn update_layout(&mut self) {
        let half_extents = slab_half_extents(self.canvas.aspect_ratio());
        self.camera.projection_mode = ProjectionMode::Orthographic { half_extents };
        self.camera.set_aspect_ratio(half_extents.x / half_extents.y);
        let queue = self.canvas.context().queue();
        self.camera_binding.update(queue, &self.camera);
        self.slab.set_model(queue, Mat4::from_scale((2.0 * half_extents).extend(1.0)));
    }

    /// Slab matrix and marker position for `input`.
    fn update_visuals(&mut self) {
        let queue = self.canvas.context().queue();
        self.slab.set_embed_matrix(queue, axis_slab_matrix(self.axis, self.input));

        let half_extents = slab_half_extents(self.canvas.aspect_ratio());
        let offset = self.input[self.axis.index()] - 0.5;
        let position = match self.axis.slab_object_axis() {
            Axis::Y => Vec3::new(0.0, offset * 2.0 * half_extents.y, 0.0),
            _ => Vec3::new(offset * 2.0 * half_extents.x, 0.0, 0.0),
        };
        self.marker.set_model(queue, Mat4::from_translation(position));
    }
}

/// Half extents of the view volume: the shorter canvas side spans one unit.
fn slab_half_extents(aspect_ratio: f32) -> Vec2 {
    if aspect_ratio >= 1.0 {
        Vec2::new(0.5 * aspect_ratio, 0.5)
    } else {
        Vec2::new(0.5, 0.5 / aspect_ratio)
    }
}

impl ColorWidget for AxisWidget {
    fn pointer_move(&mut self, event: &PointerEvent) {
        self.select(event);
    }

    fn pointer_down(&mut self, event: &PointerEvent) {
        self.select(event);
    }

    fn pointer_leave(&mut self) {
        self.selection.apply(None, false);
        self.input = self.selection.pending();
        self.update_visuals();
    }

    fn wheel(&mut self, _delta_y: f32) -> bool {
        false
    }

    fn render(&mut self) -> Result<()> {
        let camera = self.camera_binding.bind_group();
        let (slab, marker) = (&self.slab, &self.marker);
        self.canvas.render(self.options.background_color, |pass| {
            pass.set_bind_group(0, camera, &[]);
            slab.draw_visible(pass);
            marker.draw_visible(pass);
        })?;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
        self.update_layout();
        self.update_visuals();
    }

    fn set_color(&mut self, color: Coordinate) {
        self.selection.set(color);
        self.input = color;
        self.update_visuals();
    }

    fn sync_input(&mut self, color: Coordinate) {
        self.input = color;
        self.update_visuals();
    }

    fn color(&self) -> Coordinate {
        self.selection.pending()
    }

    fn committed_color(&self) -> Coordinate {
        self.selection.committed()
    }
}
