//! Axis widget integration tests.
//!
//! The axis widget picks analytically, but it still needs a GPU adapter to be
//! constructed. Without one these tests print a note and return early.

use std::cell::RefCell;
use std::rc::Rc;

use huepick::*;

const WIDTH: u32 = 300;
const HEIGHT: u32 = 80;

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

/// Decodes one sRGB-encoded byte to linear.
fn srgb_to_linear(byte: u8) -> f32 {
    let c = f32::from(byte) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// The linear color drawn at surface pixel `(x, y)`, y from the bottom.
fn rendered_color(pixels: &[u8], width: u32, height: u32, x: u32, y: u32) -> Vec3 {
    let row = (height - 1 - y) as usize;
    let start = (row * width as usize + x as usize) * 4;
    Vec3::new(
        srgb_to_linear(pixels[start]),
        srgb_to_linear(pixels[start + 1]),
        srgb_to_linear(pixels[start + 2]),
    )
}

fn axis_widget(context: &GpuContext, axis: Axis, initial: Coordinate) -> AxisWidget {
    axis_widget_with(context, axis, initial, Embedding::hsv())
}

fn axis_widget_with(context: &GpuContext, axis: Axis, initial: Coordinate, color: Embedding) -> AxisWidget {
    let canvas = headless_canvas(context, WIDTH, HEIGHT).unwrap();
    let mut config = AxisWidgetConfig::new(axis, color);
    config.initial = initial;
    AxisWidget::new(canvas, config).unwrap()
}

#[test]
fn y_axis_quarter_height() {
    let Some(context) = gpu_context() else { return };
    let initial = Vec3::new(0.6, 0.9, 0.3);
    let mut widget = axis_widget(&context, Axis::from_index(1).unwrap(), initial);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    widget.set_on_change(move |color| sink.borrow_mut().push(color));

    let event = PointerEvent::new(
        Vec2::new(WIDTH as f32 / 2.0, HEIGHT as f32 / 4.0),
        Vec2::ZERO,
        Buttons::NONE,
    );
    widget.pointer_move(&event);

    assert_eq!(widget.color(), Vec3::new(0.6, 0.25, 0.3));
    assert_eq!(widget.committed_color(), initial);
    assert_eq!(changes.borrow().as_slice(), &[Vec3::new(0.6, 0.25, 0.3)]);
}

#[test]
fn primary_button_commits() {
    let Some(context) = gpu_context() else { return };
    let mut widget = axis_widget(&context, Axis::X, Vec3::splat(0.5));

    let press = PointerEvent::new(Vec2::new(75.0, 40.0), Vec2::ZERO, Buttons::PRIMARY);
    widget.pointer_down(&press);
    assert_eq!(widget.committed_color(), Vec3::new(0.25, 0.5, 0.5));

    // A later hover previews without moving the commit.
    let hover = PointerEvent::new(Vec2::new(150.0, 10.0), Vec2::ZERO, Buttons::NONE);
    widget.pointer_move(&hover);
    assert_eq!(widget.color(), Vec3::new(0.5, 0.5, 0.5));
    assert_eq!(widget.committed_color(), Vec3::new(0.25, 0.5, 0.5));
}

#[test]
fn leaving_reverts_to_committed() {
    let Some(context) = gpu_context() else { return };
    let initial = Vec3::new(0.4, 0.4, 0.4);
    let mut widget = axis_widget(&context, Axis::Z, initial);

    widget.pointer_move(&PointerEvent::new(Vec2::new(270.0, 40.0), Vec2::ZERO, Buttons::NONE));
    assert_eq!(widget.color(), Vec3::new(0.4, 0.4, 0.9));

    widget.handle(&WidgetEvent::PointerLeave);
    assert_eq!(widget.color(), initial);
    assert_eq!(widget.committed_color(), initial);
}

#[test]
fn z_axis_uses_horizontal_position() {
    let Some(context) = gpu_context() else { return };
    let widget = axis_widget(&context, Axis::Z, Vec3::new(0.1, 0.2, 0.3));
    assert_eq!(widget.pick(225.0, 70.0), Vec3::new(0.1, 0.2, 0.75));
}

#[test]
fn wheel_is_not_consumed() {
    let Some(context) = gpu_context() else { return };
    let mut widget = axis_widget(&context, Axis::Y, Vec3::ZERO);
    assert!(!widget.handle(&WidgetEvent::Wheel { delta_y: 120.0 }));
}

#[test]
fn set_color_and_sync_input_do_not_notify() {
    let Some(context) = gpu_context() else { return };
    let mut widget = axis_widget(&context, Axis::X, Vec3::ZERO);
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    widget.set_on_change(move |_| *counter.borrow_mut() += 1);

    widget.set_color(Vec3::new(0.3, 0.6, 0.9));
    assert_eq!(widget.committed_color(), Vec3::new(0.3, 0.6, 0.9));
    widget.sync_input(Vec3::new(0.8, 0.1, 0.1));
    assert_eq!(widget.color(), Vec3::new(0.3, 0.6, 0.9));
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn render_and_resize() {
    let Some(context) = gpu_context() else { return };
    let mut widget = axis_widget(&context, Axis::Y, Vec3::new(0.5, 0.5, 1.0));
    widget.render().unwrap();

    widget.handle(&WidgetEvent::Resized { width: 80, height: 300 });
    assert_eq!(widget.canvas().size(), (80, 300));
    assert_eq!(widget.pick(10.0, 150.0), Vec3::new(0.5, 0.5, 1.0));
    widget.render().unwrap();
}

#[test]
fn drawn_slab_matches_analytic_pick() {
    let Some(context) = gpu_context() else { return };
    let initial = Vec3::new(0.5, 0.2, 0.8);

    for axis in [Axis::X, Axis::Y] {
        let mut widget = axis_widget_with(&context, axis, initial, Embedding::rgb());
        for (width, height) in [(WIDTH, HEIGHT), (HEIGHT, WIDTH)] {
            widget.resize(width, height);
            widget.render().unwrap();
            let pixels = widget.canvas().capture().unwrap();
            assert_eq!(pixels.len(), (width * height * 4) as usize);

            // Sample along the channel direction, off the centered marker.
            let along = if axis == Axis::Y { height } else { width };
            for fraction in [0.1, 0.3, 0.7, 0.9] {
                let step = (fraction * along as f32) as u32;
                let (x, y) = match axis {
                    Axis::Y => (width * 3 / 4, step),
                    _ => (step, height * 3 / 4),
                };
                let drawn = rendered_color(&pixels, width, height, x, y);
                let picked = widget.pick(x as f32 + 0.5, y as f32 + 0.5);
                let error = (drawn - picked).abs().max_element();
                assert!(
                    error < 0.02,
                    "{axis:?} at ({x}, {y}) on {width}x{height}: drawn {drawn}, picked {picked}"
                );
            }
        }
    }
}

#[test]
fn undrawn_canvas_captures_full_area() {
    let Some(context) = gpu_context() else { return };
    let canvas = headless_canvas(&context, 4, 4).unwrap();
    // An offscreen canvas that was never drawn still captures its full area.
    assert_eq!(canvas.capture().unwrap().len(), 4 * 4 * 4);
}

#[test]
fn unknown_axis_is_rejected() {
    assert!(matches!(Axis::from_index(7), Err(HuepickError::UnsupportedAxis(7))));
}
