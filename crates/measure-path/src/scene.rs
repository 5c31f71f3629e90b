//! A serializable bundle of view, configuration and shapes.

use serde::{Deserialize, Serialize};

use crate::config::MeasurementConfig;
use crate::projection::Viewport;
use crate::types::{MeasureError, Shape};

/// Everything needed to plan labels offline.
///
/// ```json
/// {
///   "view": { "center": { "lat": 57.7, "lng": 11.9 }, "zoom": 12,
///             "size": { "width": 800, "height": 100 } },
///   "config": { "min_pixel_distance": 0 },
///   "shapes": [ { "type": "circle", "center": { "lat": 57.69, "lng": 11.89 }, "radius": 200 } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// The map view labels are planned for.
    pub view: Viewport,
    /// Shared configuration; defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<MeasurementConfig>,
    /// Shapes in drawing order.
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Parse a scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidScene`] if the document is not a
    /// valid scene or the view has a non-positive container size.
    pub fn from_json(json: &str) -> Result<Self, MeasureError> {
        let scene: Self =
            serde_json::from_str(json).map_err(|e| MeasureError::InvalidScene(e.to_string()))?;
        let size = scene.view.size;
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(MeasureError::InvalidScene(format!(
                "view size must be positive, got {}x{}",
                size.width, size.height,
            )));
        }
        Ok(scene)
    }

    /// The scene's configuration, or the defaults.
    #[must_use]
    pub fn config_or_default(&self) -> MeasurementConfig {
        self.config.clone().unwrap_or_default()
    }
}
