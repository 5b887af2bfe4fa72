//! Committed/preview selection state shared by both widgets.

use crate::Coordinate;

/// The confirmed color and the color currently previewed under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    committed: Coordinate,
    pending: Coordinate,
}

impl Selection {
    /// Starts with both colors at `initial`.
    pub fn new(initial: Coordinate) -> Self {
        Self {
            committed: initial,
            pending: initial,
        }
    }

    /// The confirmed color.
    pub fn committed(&self) -> Coordinate {
        self.committed
    }

    /// The previewed color (equal to `committed` when nothing is hovered).
    pub fn pending(&self) -> Coordinate {
        self.pending
    }

    /// Sets both colors, as a programmatic selection does.
    pub fn set(&mut self, color: Coordinate) {
        self.committed = color;
        self.pending = color;
    }

    /// Feeds one pick into the state machine.
    ///
    /// A hit becomes the preview and, while `selecting`, is committed. A miss
    /// reverts the preview to the committed color. Returns the coordinate the
    /// host should be notified about, which is `None` on a miss.
    pub fn apply(&mut self, picked: Option<Coordinate>, selecting: bool) -> Option<Coordinate> {
        match picked {
            Some(coordinate) => {
                self.pending = coordinate;
                if selecting {
                    self.committed = coordinate;
                }
                Some(coordinate)
            }
            None => {
                self.pending = self.committed;
                None
            }
        }
    }
}
