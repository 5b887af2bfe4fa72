//! Configuration options for huepick widgets.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{HuepickError, Result};
use crate::orbit::OrbitOptions;

/// Options shared by the axis and space widgets.
///
/// Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    /// Orbit camera pose and speeds (space widget).
    pub orbit: OrbitOptions,

    /// Clear color of the on-screen target.
    pub background_color: Vec3,

    /// Radius of the cursor marker sphere in render space.
    pub cursor_radius: f32,

    /// Vertical field of view of the space widget's camera.
    pub field_of_view_degrees: f32,

    /// Axis along which the space widget's slice cuts.
    pub slice_axis: Axis,

    /// Whether the space widget draws the cross-section plane at the cut.
    pub cross_section: bool,

    /// Whether the cross-section shows out-of-gamut colors as neutral gray.
    pub clip_out_of_gamut: bool,

    /// Segments of the volume box mesh along X, Y and Z.
    pub segments: [u32; 3],
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            orbit: OrbitOptions::default(),
            background_color: Vec3::splat(0.8),
            cursor_radius: 0.1,
            field_of_view_degrees: 40.0,
            slice_axis: Axis::X,
            cross_section: true,
            clip_out_of_gamut: false,
            segments: [64, 8, 8],
        }
    }
}

impl WidgetOptions {
    /// Parses options from JSON, filling in defaults for missing fields.
    ///
    /// Out-of-range values are rejected with [`HuepickError::InvalidOption`].
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.orbit.validate()?;
        if !(self.cursor_radius.is_finite() && self.cursor_radius > 0.0) {
            return Err(HuepickError::InvalidOption(format!(
                "cursor_radius must be positive, got {}",
                self.cursor_radius
            )));
        }
        if !(self.field_of_view_degrees > 0.0 && self.field_of_view_degrees < 180.0) {
            return Err(HuepickError::InvalidOption(format!(
                "field_of_view_degrees must be in (0, 180), got {}",
                self.field_of_view_degrees
            )));
        }
        Ok(())
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = WidgetOptions::from_json(r#"{ "slice_axis": "Z", "orbit": { "radius": 6.0 } }"#).unwrap();
        assert_eq!(options.slice_axis, Axis::Z);
        assert_eq!(options.orbit.radius, 6.0);
        assert_eq!(options.orbit.phi, 1.0);
        assert_eq!(options.segments, [64, 8, 8]);
    }

    #[test]
    fn test_json_round_trip() {
        let options = WidgetOptions {
            clip_out_of_gamut: true,
            ..WidgetOptions::default()
        };
        let parsed = WidgetOptions::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_non_positive_radius_floor_is_rejected() {
        let result = WidgetOptions::from_json(r#"{ "orbit": { "min_radius": -1.0 } }"#);
        assert!(matches!(result, Err(HuepickError::InvalidOption(_))));
        let result = WidgetOptions::from_json(r#"{ "orbit": { "min_radius": 0.0 } }"#);
        assert!(matches!(result, Err(HuepickError::InvalidOption(_))));
    }

    #[test]
    fn test_out_of_range_view_options_are_rejected() {
        assert!(WidgetOptions::from_json(r#"{ "field_of_view_degrees": 180.0 }"#).is_err());
        assert!(WidgetOptions::from_json(r#"{ "cursor_radius": 0.0 }"#).is_err());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(WidgetOptions::from_json("{ \"segments\": 3 }").is_err());
    }
}
