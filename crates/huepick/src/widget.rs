//! The interface shared by the axis and space widgets.

use huepick_core::{Coordinate, PointerEvent, Result};

/// Host notification for a new preview or committed color.
pub type ChangeCallback = Box<dyn FnMut(Coordinate)>;

/// An input event routed to a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    /// The pointer moved over the widget.
    PointerMove(PointerEvent),
    /// A button was pressed over the widget.
    PointerDown(PointerEvent),
    /// A button was released over the widget.
    PointerUp(PointerEvent),
    /// The pointer left the widget's surface.
    PointerLeave,
    /// Wheel input, in pixels, positive away from the user (DOM `deltaY`).
    Wheel {
        /// Vertical scroll amount.
        delta_y: f32,
    },
    /// The drawable surface changed size.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

/// A pointer-driven color selector.
pub trait ColorWidget {
    /// Hover (or drag, with the primary button held).
    fn pointer_move(&mut self, event: &PointerEvent);

    /// Button press; selects like a drag step.
    fn pointer_down(&mut self, event: &PointerEvent);

    /// Button release.
    fn pointer_up(&mut self, _event: &PointerEvent) {}

    /// The pointer left the surface; the preview reverts to the committed color.
    fn pointer_leave(&mut self);

    /// Wheel input. Returns whether the widget consumed it.
    fn wheel(&mut self, delta_y: f32) -> bool;

    /// Draws the visible scene and presents.
    fn render(&mut self) -> Result<()>;

    /// Adapts to a new surface size.
    fn resize(&mut self, width: u32, height: u32);

    /// Programmatic selection. Does not notify the host.
    fn set_color(&mut self, color: Coordinate);

    /// Mirrors a color chosen elsewhere without touching the selection.
    fn sync_input(&mut self, color: Coordinate);

    /// The previewed color.
    fn color(&self) -> Coordinate;

    /// The committed color.
    fn committed_color(&self) -> Coordinate;

    /// Dispatches an event. Returns `true` when the event was consumed and
    /// must not propagate to the host.
    fn handle(&mut self, event: &WidgetEvent) -> bool {
        match event {
            WidgetEvent::PointerMove(pointer) => {
                self.pointer_move(pointer);
                false
            }
            WidgetEvent::PointerDown(pointer) => {
                self.pointer_down(pointer);
                false
            }
            WidgetEvent::PointerUp(pointer) => {
                self.pointer_up(pointer);
                false
            }
            WidgetEvent::PointerLeave => {
                self.pointer_leave();
                false
            }
            WidgetEvent::Wheel { delta_y } => self.wheel(*delta_y),
            WidgetEvent::Resized { width, height } => {
                self.resize(*width, *height);
                false
            }
        }
    }
}
