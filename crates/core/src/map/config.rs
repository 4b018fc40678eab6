//! Viewport and overlay configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{Bounds, LonLat, CONTINENTAL_US, US_CENTER};

/// Construction-time viewport settings. Immutable for an instance's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportOptions {
    /// Engine style identifier.
    pub style: String,
    pub center: LonLat,
    pub zoom: f64,
    /// Panning is restricted to this box.
    pub bounds: Bounds,
    /// Zooming out past this level is not allowed.
    pub min_zoom: f64,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            style: "mapbox://styles/mapbox/light-v11".to_string(),
            center: US_CENTER,
            zoom: 3.5,
            bounds: CONTINENTAL_US,
            min_zoom: 2.0,
        }
    }
}

impl ViewportOptions {
    /// Check that bounds are well-formed, contain the center, and that the
    /// initial zoom respects the floor.
    pub fn validate(&self) -> Result<()> {
        if !self.bounds.is_valid() {
            return Err(Error::InvalidViewport {
                field: "bounds",
                value: format!("{:?}", self.bounds.to_array()),
                reason: "corners must be finite and ordered south-west to north-east".into(),
            });
        }
        if !self.bounds.contains(self.center) {
            return Err(Error::InvalidViewport {
                field: "center",
                value: format!("{:?}", self.center.to_array()),
                reason: "must lie inside the navigable bounds".into(),
            });
        }
        if !self.min_zoom.is_finite() || self.min_zoom < 0.0 {
            return Err(Error::InvalidViewport {
                field: "min_zoom",
                value: self.min_zoom.to_string(),
                reason: "must be a non-negative number".into(),
            });
        }
        if !self.zoom.is_finite() || self.zoom < self.min_zoom {
            return Err(Error::InvalidViewport {
                field: "zoom",
                value: self.zoom.to_string(),
                reason: format!("must be at least min_zoom ({})", self.min_zoom),
            });
        }
        Ok(())
    }
}

/// Administrative boundary overlay drawn under the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryStyle {
    pub source_id: String,
    /// Vector tile set URL.
    pub url: String,
    pub source_layer: String,
    /// Feature property compared against `country_code`.
    pub country_property: String,
    pub country_code: String,
    pub fill_layer_id: String,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub outline_layer_id: String,
    pub outline_color: String,
    pub outline_width: f64,
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        Self {
            source_id: "states".to_string(),
            url: "mapbox://mapbox.boundaries-adm1-v3".to_string(),
            source_layer: "boundaries_admin_1".to_string(),
            country_property: "iso_3166_1".to_string(),
            country_code: "US".to_string(),
            fill_layer_id: "state-fills".to_string(),
            fill_color: "#f0f0f0".to_string(),
            fill_opacity: 0.1,
            outline_layer_id: "state-borders".to_string(),
            outline_color: "#a0a0a0".to_string(),
            outline_width: 1.0,
        }
    }
}

/// Route line and endpoint marker appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    pub source_id: String,
    pub layer_id: String,
    pub line_color: String,
    pub line_width: f64,
    /// CSS class applied to both endpoint markers.
    pub marker_class: String,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            source_id: "route".to_string(),
            layer_id: "route".to_string(),
            line_color: "#3B82F6".to_string(),
            line_width: 3.0,
            marker_class: "text-blue-600".to_string(),
        }
    }
}

/// Everything the map composer needs to configure an engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: ViewportOptions,
    pub boundary: BoundaryStyle,
    pub route: RouteStyle,
}

impl MapConfig {
    /// Parse a JSON document; omitted fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(text)?;
        config.viewport.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
