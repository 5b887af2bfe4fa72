//! Pick results and the pixel encoding shared with the GPU encoding pass.
//!
//! The encoding pass writes `vec4(coordinate, tag)` into a float target. Alpha
//! 0 is the cleared background, so every pickable object needs a tag of at
//! least 1.

use crate::error::{HuepickError, Result};
use crate::Coordinate;

/// Largest tag (exclusive) that survives the `u32 -> f32 -> u32` round trip exactly.
pub const MAX_TAG: u32 = 1 << 24;

/// Result of a pick operation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PickResult {
    /// The decoded domain coordinate. Meaningless when `valid` is false.
    pub coordinate: Coordinate,
    /// Tag of the object that produced the pixel (0 on a miss).
    pub tag: u32,
    /// Whether something was hit.
    pub valid: bool,
}

impl PickResult {
    /// A background (or failed) pick.
    #[must_use]
    pub fn miss() -> Self {
        Self::default()
    }

    /// A hit on the object with the given tag.
    #[must_use]
    pub fn hit(coordinate: Coordinate, tag: u32) -> Self {
        Self {
            coordinate,
            tag,
            valid: true,
        }
    }

    /// Returns the coordinate if this pick hit something.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.valid.then_some(self.coordinate)
    }
}

/// Decodes one RGBA float pixel read back from the encoding target.
#[must_use]
pub fn decode_pixel(pixel: [f32; 4]) -> PickResult {
    let [r, g, b, a] = pixel;
    if a == 0.0 {
        return PickResult::miss();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let tag = a.round().max(0.0) as u32;
    PickResult::hit(Coordinate::new(r, g, b), tag)
}

/// Validates a tag supplied at construction time.
pub fn validate_tag(tag: u32) -> Result<u32> {
    if tag == 0 || tag >= MAX_TAG {
        return Err(HuepickError::InvalidTag(tag));
    }
    Ok(tag)
}

/// Which of a space widget's pickable objects produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// The (possibly sliced) volume.
    Volume,
    /// The interior cross-section plane.
    CrossSection,
}

impl ObjectKind {
    /// Tag offset from the widget's base tag.
    #[must_use]
    pub fn tag_offset(self) -> u32 {
        match self {
            ObjectKind::Volume => 0,
            ObjectKind::CrossSection => 1,
        }
    }

    /// Resolves a picked tag against the widget's base tag.
    #[must_use]
    pub fn from_tag(base_tag: u32, tag: u32) -> Option<Self> {
        match tag.checked_sub(base_tag)? {
            0 => Some(ObjectKind::Volume),
            1 => Some(ObjectKind::CrossSection),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_alpha_is_miss() {
        let result = decode_pixel([0.3, 0.4, 0.5, 0.0]);
        assert!(!result.valid);
        assert_eq!(result.coordinate(), None);
    }

    #[test]
    fn test_decode_hit() {
        let result = decode_pixel([0.25, 0.5, 1.0, 3.0]);
        assert!(result.valid);
        assert_eq!(result.tag, 3);
        assert_eq!(result.coordinate(), Some(Coordinate::new(0.25, 0.5, 1.0)));
    }

    #[test]
    fn test_decode_keeps_out_of_range_coordinates() {
        let result = decode_pixel([-0.01, 1.02, 0.5, 1.0]);
        assert_eq!(result.coordinate, Coordinate::new(-0.01, 1.02, 0.5));
    }

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag(0).is_err());
        assert!(validate_tag(MAX_TAG).is_err());
        assert_eq!(validate_tag(1).unwrap(), 1);
        assert_eq!(validate_tag(MAX_TAG - 1).unwrap(), MAX_TAG - 1);
    }

    #[test]
    fn test_object_kind_from_tag() {
        assert_eq!(ObjectKind::from_tag(4, 4), Some(ObjectKind::Volume));
        assert_eq!(ObjectKind::from_tag(4, 5), Some(ObjectKind::CrossSection));
        assert_eq!(ObjectKind::from_tag(4, 3), None);
        assert_eq!(ObjectKind::from_tag(4, 9), None);
    }
}
