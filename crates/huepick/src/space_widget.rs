//! Full 3D color-space picker with orbit camera and slicing.

use glam::{Mat4, Vec2, Vec3};
use huepick_core::{
    validate_tag, Coordinate, Embedding, HuepickError, ObjectKind, OrbitController, PickResult,
    PointerEvent, Result, Selection, Slice, WidgetOptions,
};
use huepick_render::{
    Camera, CameraBinding, Canvas, CpuMesh, EmbeddedObject, FragmentStage, ObjectDescriptor,
    PickEngine, Pickable, SceneLayouts, FLAG_CLIP_OUT_OF_GAMUT,
};

use crate::widget::{ChangeCallback, ColorWidget};

/// Wheel pixels per unit of zoom input.
const WHEEL_DIVISOR: f32 = 10.0;

/// Construction parameters for a [`SpaceWidget`].
#[derive(Debug, Clone)]
pub struct SpaceWidgetConfig {
    /// Initial selection.
    pub initial: Coordinate,
    /// Layout of the volume in render space.
    pub space_embedding: Embedding,
    /// Display color mapping.
    pub color_embedding: Embedding,
    /// Pick tag of the volume; the cross-section uses `tag + 1`.
    pub tag: u32,
    /// Initial slice value.
    pub slice: f32,
    /// Shared widget options.
    pub options: WidgetOptions,
}

impl SpaceWidgetConfig {
    /// Config with a black initial color, tag 1, no slicing and default options.
    pub fn new(space_embedding: Embedding, color_embedding: Embedding) -> Self {
        Self {
            initial: Coordinate::ZERO,
            space_embedding,
            color_embedding,
            tag: 1,
            slice: 1.0,
            options: WidgetOptions::default(),
        }
    }
}

/// A sliceable volume of the color space, navigated with an orbit camera.
pub struct SpaceWidget {
    canvas: Canvas,
    camera: Camera,
    camera_binding: CameraBinding,
    controller: OrbitController,
    pick_engine: PickEngine,
    volume: EmbeddedObject,
    cross_section: Option<EmbeddedObject>,
    marker: EmbeddedObject,
    space_embedding: Embedding,
    selection: Selection,
    marker_coordinate: Coordinate,
    slice: Slice,
    tag: u32,
    hovered: Option<ObjectKind>,
    options: WidgetOptions,
    on_change: Option<ChangeCallback>,
}

impl SpaceWidget {
    /// Creates the widget on `canvas`.
    pub fn new(canvas: Canvas, config: SpaceWidgetConfig) -> Result<Self> {
        config.options.validate()?;
        let tag = validate_tag(config.tag)?;
        validate_tag(tag + ObjectKind::CrossSection.tag_offset())?;

        let context = canvas.context().clone();
        let device = context.device();
        let layouts = SceneLayouts::new(device);
        let options = config.options;
        let slice = Slice::new(options.slice_axis, config.slice);

        let volume = EmbeddedObject::new(
            &context,
            &layouts,
            canvas.format(),
            &ObjectDescriptor {
                label: "space volume",
                mesh: &CpuMesh::unit_box(options.segments),
                space_embedding: &config.space_embedding,
                color_embedding: &config.color_embedding,
                fragment: FragmentStage::Visible,
                tag: Some(tag),
                depth_bias: false,
            },
        )?;

        let cross_section = if options.cross_section {
            let (u, v) = slice.axis().plane_axes();
            let mut plane = EmbeddedObject::new(
                &context,
                &layouts,
                canvas.format(),
                &ObjectDescriptor {
                    label: "space cross-section",
                    mesh: &CpuMesh::plane(options.segments[u.index()], options.segments[v.index()]),
                    space_embedding: &config.space_embedding,
                    color_embedding: &config.color_embedding,
                    fragment: FragmentStage::Visible,
                    tag: Some(tag + ObjectKind::CrossSection.tag_offset()),
                    depth_bias: true,
                },
            )?;
            if options.clip_out_of_gamut {
                plane.set_flags(context.queue(), FLAG_CLIP_OUT_OF_GAMUT);
            }
            Some(plane)
        } else {
            None
        };

        let marker = EmbeddedObject::new(
            &context,
            &layouts,
            canvas.format(),
            &ObjectDescriptor {
                label: "space marker",
                mesh: &CpuMesh::sphere(options.cursor_radius, 16, 8),
                space_embedding: &Embedding::flat(),
                color_embedding: &config.color_embedding,
                fragment: FragmentStage::Marker,
                tag: None,
                depth_bias: false,
            },
        )?;

        let mut camera = Camera::new(canvas.aspect_ratio());
        camera.set_fov_degrees(options.field_of_view_degrees);
        let camera_binding = CameraBinding::new(device, &layouts.camera);
        let controller = OrbitController::new(&options.orbit);

        log::info!(
            "space widget created ({} / {}, tag {tag}, {}x{})",
            config.space_embedding.name(),
            config.color_embedding.name(),
            canvas.width(),
            canvas.height()
        );
        if !config.space_embedding.has_forward() {
            log::warn!(
                "space embedding '{}' has no host forward; the marker is hidden",
                config.space_embedding.name()
            );
        }

        let mut widget = Self {
            pick_engine: PickEngine::new(&context),
            canvas,
            camera,
            camera_binding,
            controller,
            volume,
            cross_section,
            marker,
            space_embedding: config.space_embedding,
            selection: Selection::new(config.initial),
            marker_coordinate: config.initial,
            slice,
            tag,
            hovered: None,
            options,
            on_change: None,
        };
        widget.update_camera();
        widget.update_slice();
        widget.update_marker();
        Ok(widget)
    }

    /// Registers the change callback.
    pub fn set_on_change(&mut self, callback: impl FnMut(Coordinate) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Moves the cut, clamped into `[0, 1]`.
    pub fn set_slice(&mut self, value: f32) {
        self.slice.set_value(value);
        log::debug!("slice {:?} = {}", self.slice.axis(), self.slice.value());
        self.update_slice();
    }

    /// The current cut.
    pub fn slice(&self) -> Slice {
        self.slice
    }

    /// Which object the last valid pick hit.
    pub fn hovered_object(&self) -> Option<ObjectKind> {
        self.hovered
    }

    /// The orbit controller driving the camera.
    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    /// Applies an orbit movement directly, as a drag or wheel would.
    pub fn orbit(&mut self, delta: Vec3) {
        self.controller.on_move(delta);
        self.update_camera();
    }

    /// The widget's canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The volume's base tag.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Picks at surface pixel `(x, y)` through the encoding scene.
    pub fn pick(&mut self, x: f32, y: f32) -> PickResult {
        let mut objects: Vec<&dyn Pickable> = vec![&self.volume];
        if let Some(plane) = &self.cross_section {
            objects.push(plane);
        }
        self.pick_engine
            .pick(&self.canvas, self.camera_binding.bind_group(), &objects, x, y)
    }

    /// Projects the render-space position of `color` to surface pixels
    /// (origin bottom-left).
    ///
    /// Fails when the space embedding has no host forward.
    pub fn screen_position(&self, color: Coordinate) -> Result<Option<Vec2>> {
        let world = self
            .space_embedding
            .forward(color)
            .ok_or_else(|| HuepickError::MissingForward(self.space_embedding.name().to_owned()))?;
        let (width, height) = self.canvas.size();
        Ok(self.camera.project_to_pixel(world, width, height))
    }

    fn select(&mut self, event: &PointerEvent) {
        let selecting = event.buttons.is_selecting();
        let result = self.pick(event.position.x, event.position.y);
        if result.valid {
            self.hovered = ObjectKind::from_tag(self.tag, result.tag);
        }

        let notified = self.selection.apply(result.coordinate(), selecting);
        self.marker_coordinate = self.selection.pending();
        self.update_marker();
        if let (Some(color), Some(callback)) = (notified, self.on_change.as_mut()) {
            callback(color);
        }

        if selecting {
            self.orbit(Vec3::new(event.movement.x, event.movement.y, 0.0));
        }
    }

    fn update_camera(&mut self) {
        self.camera.look_at(
            self.controller.position(),
            self.controller.look_at(),
            self.controller.up(),
        );
        self.camera.set_aspect_ratio(self.canvas.aspect_ratio());
        self.camera_binding
            .update(self.canvas.context().queue(), &self.camera);
    }

    fn update_slice(&mut self) {
        let queue = self.canvas.context().queue();
        self.volume.set_embed_matrix(queue, self.slice.volume_matrix());
        if let Some(plane) = &mut self.cross_section {
            plane.set_embed_matrix(queue, self.slice.cross_section_matrix());
        }
    }

    fn update_marker(&mut self) {
        match self.space_embedding.forward(self.marker_coordinate) {
            Some(position) => {
                self.marker.set_visible(true);
                self.marker
                    .set_model(self.canvas.context().queue(), Mat4::from_translation(position));
            }
            None => self.marker.set_visible(false),
        }
    }
}

impl ColorWidget for SpaceWidget {
    fn pointer_move(&mut self, event: &PointerEvent) {
        self.select(event);
    }

    fn pointer_down(&mut self, event: &PointerEvent) {
        self.select(event);
    }

    fn pointer_leave(&mut self) {
        self.selection.apply(None, false);
        self.marker_coordinate = self.selection.pending();
        self.update_marker();
    }

    fn wheel(&mut self, delta_y: f32) -> bool {
        self.orbit(Vec3::new(0.0, 0.0, delta_y / WHEEL_DIVISOR));
        true
    }

    fn render(&mut self) -> Result<()> {
        let camera = self.camera_binding.bind_group();
        let (volume, cross_section, marker) = (&self.volume, &self.cross_section, &self.marker);
        self.canvas.render(self.options.background_color, |pass| {
            pass.set_bind_group(0, camera, &[]);
            volume.draw_visible(pass);
            if let Some(plane) = cross_section {
                plane.draw_visible(pass);
            }
            marker.draw_visible(pass);
        })?;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
        self.pick_engine.resize(self.canvas.width(), self.canvas.height());
        self.update_camera();
    }

    fn set_color(&mut self, color: Coordinate) {
        self.selection.set(color);
        self.marker_coordinate = color;
        self.update_marker();
    }

    fn sync_input(&mut self, color: Coordinate) {
        self.marker_coordinate = color;
        self.update_marker();
    }

    fn color(&self) -> Coordinate {
        self.selection.pending()
    }

    fn committed_color(&self) -> Coordinate {
        self.selection.committed()
    }
}
