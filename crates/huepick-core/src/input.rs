//! Pointer input in surface coordinates.
//!
//! Surface coordinates put the origin at the bottom-left corner with y growing
//! upward, matching the pick target's row flip. Window systems report y from
//! the top; [`PointerEvent::from_client`] converts.

use glam::Vec2;

/// Bitmask of held pointer buttons, using DOM `buttons` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Buttons(u8);

impl Buttons {
    /// No buttons held.
    pub const NONE: Buttons = Buttons(0);
    /// Primary (usually left) button.
    pub const PRIMARY: Buttons = Buttons(1);
    /// Secondary (usually right) button.
    pub const SECONDARY: Buttons = Buttons(2);
    /// Auxiliary (usually middle) button.
    pub const AUXILIARY: Buttons = Buttons(4);

    /// Whether every button in `other` is held.
    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }

    /// Adds the buttons in `other`.
    pub fn insert(&mut self, other: Buttons) {
        self.0 |= other.0;
    }

    /// Removes the buttons in `other`.
    pub fn remove(&mut self, other: Buttons) {
        self.0 &= !other.0;
    }

    /// True when the primary button is the only one held. Chords do not select.
    pub fn is_selecting(self) -> bool {
        self == Buttons::PRIMARY
    }
}

impl std::ops::BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 | rhs.0)
    }
}

/// A pointer sample delivered to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    /// Position in surface pixels, y from the bottom.
    pub position: Vec2,
    /// Movement since the previous sample, in window pixels (y down).
    pub movement: Vec2,
    /// Buttons held during the sample.
    pub buttons: Buttons,
}

impl PointerEvent {
    /// Creates an event from surface coordinates.
    pub fn new(position: Vec2, movement: Vec2, buttons: Buttons) -> Self {
        Self {
            position,
            movement,
            buttons,
        }
    }

    /// Creates an event from window-client coordinates (y from the top).
    pub fn from_client(client: Vec2, movement: Vec2, buttons: Buttons, surface_height: f32) -> Self {
        Self::new(Vec2::new(client.x, surface_height - client.y), movement, buttons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_client_flips_y() {
        let event = PointerEvent::from_client(Vec2::new(10.0, 30.0), Vec2::ZERO, Buttons::NONE, 100.0);
        assert_eq!(event.position, Vec2::new(10.0, 70.0));
    }

    #[test]
    fn test_selecting_requires_primary_only() {
        assert!(Buttons::PRIMARY.is_selecting());
        assert!(!(Buttons::PRIMARY | Buttons::SECONDARY).is_selecting());
        assert!(!Buttons::NONE.is_selecting());

        let mut buttons = Buttons::NONE;
        buttons.insert(Buttons::AUXILIARY);
        buttons.insert(Buttons::PRIMARY);
        assert!(buttons.contains(Buttons::PRIMARY));
        buttons.remove(Buttons::AUXILIARY);
        assert!(buttons.is_selecting());
    }
}
