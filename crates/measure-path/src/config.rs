//! Measurement session configuration.

use serde::{Deserialize, Serialize};

use crate::types::MeasureError;

/// Unit system used for formatted measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Meters, kilometers, square meters, square kilometers.
    #[default]
    Metric,
    /// Feet, miles, square feet, acres.
    Imperial,
}

impl UnitSystem {
    /// Returns `true` for [`UnitSystem::Imperial`].
    #[must_use]
    pub const fn is_imperial(self) -> bool {
        matches!(self, Self::Imperial)
    }
}

/// Tooltip strings attached to each label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelText {
    /// Title of the running-total label on open paths.
    pub total_length: String,
    /// Title of the area label on polygons and circles.
    pub total_area: String,
    /// Title of each segment label.
    pub segment_length: String,
}

impl Default for LabelText {
    fn default() -> Self {
        Self {
            total_length: "Total length".to_owned(),
            total_area: "Total area".to_owned(),
            segment_length: "Segment length".to_owned(),
        }
    }
}

/// Options for one measurement session.
///
/// Supplied once per session and replaced wholesale. Every field has a
/// default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Defer labels until the pointer enters the shape, and remove them
    /// when it leaves.
    pub show_on_hover: bool,

    /// Segments shorter than this on screen (pixels) get no label.
    pub min_pixel_distance: f64,

    /// Show labels for segments under `min_pixel_distance` anyway, flagged
    /// with [`MeasurementLabel::below_min_distance`](crate::MeasurementLabel::below_min_distance).
    pub show_on_min_pixel_distance: bool,

    /// Emit per-segment and total length labels.
    pub show_distances: bool,

    /// Emit the area label for polygons and circles.
    pub show_area: bool,

    /// Emit plain vertex markers at both ends of each labelled segment.
    pub show_vertices: bool,

    /// Consecutive segments whose bearings differ by less than this many
    /// degrees are labelled as one. `0` disables merging.
    pub angle_tolerance: f64,

    /// Unit system for formatted text.
    pub units: UnitSystem,

    /// Tooltip strings.
    pub lang: LabelText,
}

impl MeasurementConfig {
    /// Default minimum on-screen segment length for a label, in pixels.
    pub const DEFAULT_MIN_PIXEL_DISTANCE: f64 = 30.0;

    /// Default merge tolerance in degrees (merging disabled).
    pub const DEFAULT_ANGLE_TOLERANCE: f64 = 0.0;

    /// Parse a configuration from a JSON document.
    ///
    /// Missing fields take their defaults. The result is sanitized.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidConfig`] if the document is not valid
    /// JSON or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, MeasureError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MeasureError::InvalidConfig(e.to_string()))?;
        Ok(config.sanitized())
    }

    /// Return a copy with out-of-range numeric options clamped.
    ///
    /// Negative or non-finite `angle_tolerance` becomes `0` (never merge);
    /// negative or non-finite `min_pixel_distance` becomes `0` (always
    /// show).
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            min_pixel_distance: non_negative(self.min_pixel_distance),
            angle_tolerance: non_negative(self.angle_tolerance),
            ..self.clone()
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            show_on_hover: false,
            min_pixel_distance: Self::DEFAULT_MIN_PIXEL_DISTANCE,
            show_on_min_pixel_distance: false,
            show_distances: true,
            show_area: true,
            show_vertices: false,
            angle_tolerance: Self::DEFAULT_ANGLE_TOLERANCE,
            units: UnitSystem::default(),
            lang: LabelText::default(),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plugin_options() {
        let config = MeasurementConfig::default();
        assert!(!config.show_on_hover);
        assert!((config.min_pixel_distance - 30.0).abs() < f64::EPSILON);
        assert!(!config.show_on_min_pixel_distance);
        assert!(config.show_distances);
        assert!(config.show_area);
        assert!(!config.show_vertices);
        assert!(config.angle_tolerance.abs() < f64::EPSILON);
        assert_eq!(config.units, UnitSystem::Metric);
        assert_eq!(config.lang.segment_length, "Segment length");
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config =
            MeasurementConfig::from_json(r#"{"units":"imperial","angle_tolerance":15}"#).unwrap();
        assert!(config.units.is_imperial());
        assert!((config.angle_tolerance - 15.0).abs() < f64::EPSILON);
        assert!(config.show_distances);
        assert_eq!(config.lang.total_area, "Total area");
    }

    #[test]
    fn partial_lang_keeps_other_strings() {
        let config =
            MeasurementConfig::from_json(r#"{"lang":{"total_area":"Yta"}}"#).unwrap();
        assert_eq!(config.lang.total_area, "Yta");
        assert_eq!(config.lang.total_length, "Total length");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = MeasurementConfig::from_json(r#"{"units":"furlongs"}"#).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidConfig(_)));
    }

    #[test]
    fn sanitized_clamps_negative_tolerance() {
        let config = MeasurementConfig {
            angle_tolerance: -5.0,
            min_pixel_distance: f64::NAN,
            ..MeasurementConfig::default()
        }
        .sanitized();
        assert!(config.angle_tolerance.abs() < f64::EPSILON);
        assert!(config.min_pixel_distance.abs() < f64::EPSILON);
    }

    #[test]
    fn sanitized_keeps_valid_values() {
        let config = MeasurementConfig {
            angle_tolerance: 12.5,
            min_pixel_distance: 40.0,
            ..MeasurementConfig::default()
        };
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = MeasurementConfig {
            show_vertices: true,
            units: UnitSystem::Imperial,
            ..MeasurementConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MeasurementConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
