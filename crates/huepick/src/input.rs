//! Translation of winit window events into widget events.

use glam::Vec2;
use huepick_core::{Buttons, PointerEvent};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::widget::WidgetEvent;

/// Pixels per wheel line, for devices that report line deltas.
const PIXELS_PER_LINE: f32 = 100.0;

/// Tracks cursor position and held buttons for one window.
///
/// winit reports y from the top of the window; events produced here are in
/// surface coordinates (y from the bottom).
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    cursor: Option<Vec2>,
    buttons: Buttons,
    surface_height: f32,
}

impl PointerTracker {
    /// Creates a tracker for a surface of the given height.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(surface_height: u32) -> Self {
        Self {
            surface_height: surface_height as f32,
            ..Self::default()
        }
    }

    /// Currently held buttons.
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Translates one window event, if it concerns a widget.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn translate(&mut self, event: &WindowEvent) -> Option<WidgetEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::CursorLeft { .. } => Some(self.cursor_left()),
            WindowEvent::MouseInput { state, button, .. } => {
                let flag = button_flag(*button)?;
                let client = self.cursor?;
                match state {
                    ElementState::Pressed => {
                        self.buttons.insert(flag);
                        Some(WidgetEvent::PointerDown(self.pointer_event(client, Vec2::ZERO)))
                    }
                    ElementState::Released => {
                        self.buttons.remove(flag);
                        Some(WidgetEvent::PointerUp(self.pointer_event(client, Vec2::ZERO)))
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Match DOM deltaY: positive scrolls away from the content top.
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                Some(WidgetEvent::Wheel { delta_y })
            }
            WindowEvent::Resized(size) => {
                self.surface_height = size.height as f32;
                Some(WidgetEvent::Resized {
                    width: size.width,
                    height: size.height,
                })
            }
            _ => None,
        }
    }

    fn cursor_moved(&mut self, client: Vec2) -> WidgetEvent {
        let movement = self.cursor.map_or(Vec2::ZERO, |last| client - last);
        self.cursor = Some(client);
        WidgetEvent::PointerMove(self.pointer_event(client, movement))
    }

    fn cursor_left(&mut self) -> WidgetEvent {
        self.cursor = None;
        WidgetEvent::PointerLeave
    }

    fn pointer_event(&self, client: Vec2, movement: Vec2) -> PointerEvent {
        PointerEvent::from_client(client, movement, self.buttons, self.surface_height)
    }
}

fn button_flag(button: MouseButton) -> Option<Buttons> {
    match button {
        MouseButton::Left => Some(Buttons::PRIMARY),
        MouseButton::Right => Some(Buttons::SECONDARY),
        MouseButton::Middle => Some(Buttons::AUXILIARY),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mapping() {
        assert_eq!(button_flag(MouseButton::Left), Some(Buttons::PRIMARY));
        assert_eq!(button_flag(MouseButton::Middle), Some(Buttons::AUXILIARY));
        assert_eq!(button_flag(MouseButton::Back), None);
    }

    #[test]
    fn test_new_tracker_has_no_buttons() {
        let tracker = PointerTracker::new(480);
        assert_eq!(tracker.buttons(), Buttons::NONE);
    }

    #[test]
    fn test_cursor_left_is_forwarded() {
        let mut tracker = PointerTracker::new(480);
        match tracker.cursor_moved(Vec2::new(10.0, 20.0)) {
            WidgetEvent::PointerMove(event) => assert_eq!(event.position, Vec2::new(10.0, 460.0)),
            other => panic!("unexpected event {other:?}"),
        }

        assert_eq!(tracker.cursor_left(), WidgetEvent::PointerLeave);

        // Re-entering starts a fresh movement delta.
        match tracker.cursor_moved(Vec2::new(50.0, 60.0)) {
            WidgetEvent::PointerMove(event) => assert_eq!(event.movement, Vec2::ZERO),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_resize_is_forwarded() {
        let mut tracker = PointerTracker::new(480);
        let event = WindowEvent::Resized(winit::dpi::PhysicalSize::new(640, 360));
        assert_eq!(
            tracker.translate(&event),
            Some(WidgetEvent::Resized {
                width: 640,
                height: 360
            })
        );
        assert_eq!(tracker.surface_height, 360.0);
    }
}
