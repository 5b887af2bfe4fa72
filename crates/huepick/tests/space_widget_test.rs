//! Space widget integration tests.
//!
//! These tests render through a real GPU adapter (hardware or software
//! fallback). Without one they print a note and return early.

use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use huepick::*;

const SIZE: u32 = 256;
const TOLERANCE: f32 = 0.02;

fn gpu_context() -> Option<GpuContext> {
    init_logging();
    match headless_context() {
        Ok(context) => Some(context),
        Err(e) => {
            eprintln!("Skipping GPU tests: no GPU adapter available ({e})");
            None
        }
    }
}

fn widget_facing(context: &GpuContext, space: Embedding, color: Embedding, phi: f32) -> SpaceWidget {
    let canvas = headless_canvas(context, SIZE, SIZE).unwrap();
    let mut config = SpaceWidgetConfig::new(space, color);
    config.options.orbit.phi = phi;
    config.options.orbit.theta = 0.0;
    SpaceWidget::new(canvas, config).unwrap()
}

fn assert_close(actual: Vec3, expected: Vec3) {
    let error = (actual - expected).abs().max_element();
    assert!(error < TOLERANCE, "decoded {actual}, expected {expected} (error {error})");
}

fn hover(at: Vec2) -> PointerEvent {
    PointerEvent::new(at, Vec2::ZERO, Buttons::NONE)
}

fn center() -> Vec2 {
    Vec2::splat(SIZE as f32 / 2.0)
}

#[test]
fn cube_round_trip() {
    let Some(context) = gpu_context() else { return };
    // Camera on +X looks at the c.x = 1 face.
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);

    for (y, z) in [(0.5, 0.5), (0.3, 0.4), (0.7, 0.6), (0.2, 0.8), (0.85, 0.15)] {
        let expected = Vec3::new(1.0, y, z);
        let pixel = widget.screen_position(expected).unwrap().unwrap();
        let result = widget.pick(pixel.x, pixel.y);
        assert!(result.valid, "expected a hit at {pixel} for {expected}");
        assert_close(result.coordinate, expected);
    }
}

#[test]
fn cylinder_round_trip() {
    let Some(context) = gpu_context() else { return };
    // Camera on +Z looks at the hue = 0.25 side of the cylinder.
    let mut widget = widget_facing(&context, Embedding::cylinder(), Embedding::hsv(), FRAC_PI_2);

    for (hue, value) in [(0.25, 0.5), (0.18, 0.3), (0.32, 0.7), (0.22, 0.8), (0.28, 0.2)] {
        let expected = Vec3::new(hue, value, 1.0);
        let pixel = widget.screen_position(expected).unwrap().unwrap();
        let result = widget.pick(pixel.x, pixel.y);
        assert!(result.valid, "expected a hit at {pixel} for {expected}");
        assert_close(result.coordinate, expected);
    }
}

#[test]
fn background_is_miss() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);

    let result = widget.pick(0.0, 0.0);
    assert!(!result.valid);
    assert_eq!(result.coordinate(), None);

    // Outside the canvas is a miss too.
    assert!(!widget.pick(-1.0, 10.0).valid);
    assert!(!widget.pick(10.0, SIZE as f32).valid);
}

#[test]
fn repeated_picks_are_identical() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cylinder(), Embedding::hsv(), FRAC_PI_2);

    let first = widget.pick(120.0, 140.0);
    assert!(first.valid);
    for _ in 0..3 {
        assert_eq!(widget.pick(120.0, 140.0), first);
    }
}

#[test]
fn pick_restores_screen_target() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);

    widget.pick(center().x, center().y);
    assert_eq!(widget.canvas().active_target(), ActiveTarget::Screen);
    widget.pick(0.0, 0.0);
    assert_eq!(widget.canvas().active_target(), ActiveTarget::Screen);
    widget.render().unwrap();
}

#[test]
fn slice_reveals_cut_face() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);
    widget.set_slice(0.5);
    assert_eq!(widget.slice().value(), 0.5);

    let result = widget.pick(center().x, center().y);
    assert!(result.valid);
    assert!((result.coordinate.x - 0.5).abs() < 1e-3, "decoded {}", result.coordinate);
    assert_close(result.coordinate, Vec3::splat(0.5));

    widget.pointer_move(&hover(center()));
    assert_eq!(widget.hovered_object(), Some(ObjectKind::CrossSection));

    widget.set_slice(3.0);
    assert_eq!(widget.slice().value(), 1.0);
}

#[test]
fn slice_cap_without_cross_section() {
    let Some(context) = gpu_context() else { return };
    let canvas = headless_canvas(&context, SIZE, SIZE).unwrap();
    let mut config = SpaceWidgetConfig::new(Embedding::cube(), Embedding::rgb());
    config.options.orbit.phi = 0.0;
    config.options.cross_section = false;
    let mut widget = SpaceWidget::new(canvas, config).unwrap();

    for value in [0.3, 0.5, 0.8] {
        widget.set_slice(value);
        let result = widget.pick(center().x, center().y);
        assert!(result.valid);
        assert!(
            (result.coordinate.x - value).abs() < 1e-3,
            "cut at {value} decoded {}",
            result.coordinate
        );
        widget.pointer_move(&hover(center()));
        assert_eq!(widget.hovered_object(), Some(ObjectKind::Volume));
    }
}

#[test]
fn leaving_the_surface_reverts_preview() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    widget.set_on_change(move |_| *counter.borrow_mut() += 1);
    widget.set_color(Vec3::new(0.9, 0.1, 0.4));

    // Zoomed in until the volume fills the canvas.
    widget.wheel(-750.0);
    assert!((widget.controller().state().radius - 1.0).abs() < 1e-5);
    assert!(widget.pick(0.0, 0.0).valid);
    widget.pointer_move(&hover(center()));
    assert_ne!(widget.color(), widget.committed_color());
    assert_eq!(*calls.borrow(), 1);

    assert!(!widget.handle(&WidgetEvent::PointerLeave));
    assert_eq!(widget.color(), Vec3::new(0.9, 0.1, 0.4));
    assert_eq!(widget.committed_color(), Vec3::new(0.9, 0.1, 0.4));
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn hover_previews_and_drag_commits() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    widget.set_on_change(move |color| sink.borrow_mut().push(color));

    widget.pointer_move(&hover(center()));
    let preview = widget.color();
    assert_close(preview, Vec3::new(1.0, 0.5, 0.5));
    assert_eq!(widget.committed_color(), Vec3::ZERO);
    assert_eq!(changes.borrow().len(), 1);

    let phi_before = widget.controller().state().phi;
    let drag = PointerEvent::new(center(), Vec2::new(10.0, 0.0), Buttons::PRIMARY);
    widget.pointer_down(&drag);
    assert_eq!(widget.committed_color(), widget.color());
    assert_eq!(changes.borrow().len(), 2);
    assert!((widget.controller().state().phi - phi_before - 0.1).abs() < 1e-5);
}

#[test]
fn miss_reverts_preview_without_callback() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    widget.set_on_change(move |_| *counter.borrow_mut() += 1);

    widget.set_color(Vec3::new(0.1, 0.2, 0.3));
    assert_eq!(*calls.borrow(), 0);

    widget.pointer_move(&hover(center()));
    assert_eq!(*calls.borrow(), 1);
    widget.pointer_move(&hover(Vec2::ZERO));
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(widget.color(), Vec3::new(0.1, 0.2, 0.3));
    assert_eq!(widget.committed_color(), Vec3::new(0.1, 0.2, 0.3));
}

#[test]
fn chorded_drag_does_not_commit() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);

    let chord = PointerEvent::new(center(), Vec2::new(5.0, 5.0), Buttons::PRIMARY | Buttons::SECONDARY);
    widget.pointer_down(&chord);
    assert_eq!(widget.committed_color(), Vec3::ZERO);
    assert_eq!(widget.controller().state().phi, 0.0);
}

#[test]
fn wheel_zooms_and_is_consumed() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);

    assert!(widget.handle(&WidgetEvent::Wheel { delta_y: 50.0 }));
    assert!((widget.controller().state().radius - 4.2).abs() < 1e-5);

    // Zooming far in stops at the floor.
    widget.wheel(-100_000.0);
    assert!((widget.controller().state().radius - 0.1).abs() < 1e-6);
}

#[test]
fn resize_keeps_picking_consistent() {
    let Some(context) = gpu_context() else { return };
    let mut widget = widget_facing(&context, Embedding::cube(), Embedding::rgb(), 0.0);

    widget.resize(320, 200);
    assert_eq!(widget.canvas().size(), (320, 200));
    let expected = Vec3::new(1.0, 0.4, 0.6);
    let pixel = widget.screen_position(expected).unwrap().unwrap();
    let result = widget.pick(pixel.x, pixel.y);
    assert!(result.valid);
    assert_close(result.coordinate, expected);
}

#[test]
fn invalid_configuration_is_rejected() {
    let Some(context) = gpu_context() else { return };

    let mut config = SpaceWidgetConfig::new(Embedding::cube(), Embedding::rgb());
    config.tag = 0;
    let canvas = headless_canvas(&context, 64, 64).unwrap();
    assert!(matches!(SpaceWidget::new(canvas, config), Err(HuepickError::InvalidTag(0))));

    let mut config = SpaceWidgetConfig::new(Embedding::cube(), Embedding::rgb());
    config.tag = (1 << 24) - 1;
    let canvas = headless_canvas(&context, 64, 64).unwrap();
    assert!(matches!(SpaceWidget::new(canvas, config), Err(HuepickError::InvalidTag(_))));

    assert!(matches!(
        headless_canvas(&context, 0, 64),
        Err(HuepickError::EmptySurface { width: 0, height: 64 })
    ));

    let mut config = SpaceWidgetConfig::new(Embedding::cube(), Embedding::rgb());
    config.options.orbit.min_radius = -1.0;
    let canvas = headless_canvas(&context, 64, 64).unwrap();
    assert!(matches!(SpaceWidget::new(canvas, config), Err(HuepickError::InvalidOption(_))));
}

#[test]
fn flat_space_has_no_screen_position() {
    let Some(context) = gpu_context() else { return };
    let canvas = headless_canvas(&context, 64, 64).unwrap();
    let widget = SpaceWidget::new(canvas, SpaceWidgetConfig::new(Embedding::flat(), Embedding::rgb())).unwrap();
    assert!(matches!(
        widget.screen_position(Vec3::splat(0.5)),
        Err(HuepickError::MissingForward(name)) if name == "flat"
    ));
}

#[test]
fn custom_tag_resolves_objects() {
    let Some(context) = gpu_context() else { return };
    let canvas = headless_canvas(&context, SIZE, SIZE).unwrap();
    let mut config = SpaceWidgetConfig::new(Embedding::cube(), Embedding::rgb());
    config.tag = 40;
    config.options.orbit.phi = 0.0;
    config.options.cross_section = false;
    let mut widget = SpaceWidget::new(canvas, config).unwrap();

    let result = widget.pick(center().x, center().y);
    assert_eq!(result.tag, 40);
    widget.pointer_move(&hover(center()));
    assert_eq!(widget.hovered_object(), Some(ObjectKind::Volume));
}
