//! Overlay descriptions handed to the engine, and the fixed order they are added in.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::geo::LonLat;

use super::config::MapConfig;
use super::route::RouteOverlay;

/// A data source registered with the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpec {
    /// Vector tile set referenced by URL.
    Vector { url: String },
    /// Inline GeoJSON document.
    GeoJson { data: Value },
}

/// Equality filter on a feature property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub property: String,
    pub value: String,
}

impl PropertyFilter {
    /// Expression form: `["==", ["get", property], value]`.
    pub fn to_expression(&self) -> Value {
        json!(["==", ["get", self.property], self.value])
    }

    pub fn matches(&self, properties: &Value) -> bool {
        properties
            .get(&self.property)
            .and_then(Value::as_str)
            .is_some_and(|v| v == self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
}

/// How a layer paints its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerPaint {
    Fill {
        color: String,
        opacity: f64,
    },
    Line {
        color: String,
        width: f64,
        join: LineJoin,
        cap: LineCap,
    },
}

/// A rendered layer over a registered source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    /// Layer inside a vector tile set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PropertyFilter>,
    pub paint: LayerPaint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRole {
    Origin,
    Destination,
}

/// A point marker pinned to a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub role: MarkerRole,
    pub position: LonLat,
    pub class_name: String,
}

/// One engine call in the overlay sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OverlayStep {
    AddSource { id: String, source: SourceSpec },
    AddLayer(LayerSpec),
    AddMarker(MarkerSpec),
}

impl OverlayStep {
    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::AddSource { id, .. } => format!("source:{}", id),
            Self::AddLayer(layer) => format!("layer:{}", layer.id),
            Self::AddMarker(marker) => match marker.role {
                MarkerRole::Origin => "marker:origin".to_string(),
                MarkerRole::Destination => "marker:destination".to_string(),
            },
        }
    }
}

/// The overlay sequence for one viewport: [`boundary_steps`] then [`route_steps`].
pub fn overlay_plan(config: &MapConfig, route: &RouteOverlay) -> Vec<OverlayStep> {
    let mut steps = boundary_steps(config);
    steps.extend(route_steps(config, route));
    steps
}

/// Boundary source, boundary fill, boundary outline.
pub fn boundary_steps(config: &MapConfig) -> Vec<OverlayStep> {
    let boundary = &config.boundary;
    let country_filter = PropertyFilter {
        property: boundary.country_property.clone(),
        value: boundary.country_code.clone(),
    };

    vec![
        OverlayStep::AddSource {
            id: boundary.source_id.clone(),
            source: SourceSpec::Vector {
                url: boundary.url.clone(),
            },
        },
        OverlayStep::AddLayer(LayerSpec {
            id: boundary.fill_layer_id.clone(),
            source: boundary.source_id.clone(),
            source_layer: Some(boundary.source_layer.clone()),
            filter: Some(country_filter.clone()),
            paint: LayerPaint::Fill {
                color: boundary.fill_color.clone(),
                opacity: boundary.fill_opacity,
            },
        }),
        OverlayStep::AddLayer(LayerSpec {
            id: boundary.outline_layer_id.clone(),
            source: boundary.source_id.clone(),
            source_layer: Some(boundary.source_layer.clone()),
            filter: Some(country_filter),
            paint: LayerPaint::Line {
                color: boundary.outline_color.clone(),
                width: boundary.outline_width,
                join: LineJoin::Miter,
                cap: LineCap::Butt,
            },
        }),
    ]
}

/// Route source, route line, origin marker, destination marker.
pub fn route_steps(config: &MapConfig, route: &RouteOverlay) -> Vec<OverlayStep> {
    let style = &config.route;

    vec![
        OverlayStep::AddSource {
            id: style.source_id.clone(),
            source: SourceSpec::GeoJson {
                data: route.to_geojson(),
            },
        },
        OverlayStep::AddLayer(LayerSpec {
            id: style.layer_id.clone(),
            source: style.source_id.clone(),
            source_layer: None,
            filter: None,
            paint: LayerPaint::Line {
                color: style.line_color.clone(),
                width: style.line_width,
                join: LineJoin::Round,
                cap: LineCap::Round,
            },
        }),
        OverlayStep::AddMarker(MarkerSpec {
            role: MarkerRole::Origin,
            position: route.origin,
            class_name: style.marker_class.clone(),
        }),
        OverlayStep::AddMarker(MarkerSpec {
            role: MarkerRole::Destination,
            position: route.destination,
            class_name: style.marker_class.clone(),
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_order() {
        let plan = overlay_plan(&MapConfig::default(), &RouteOverlay::sample());
        let labels: Vec<_> = plan.iter().map(OverlayStep::describe).collect();
        assert_eq!(
            labels,
            [
                "source:states",
                "layer:state-fills",
                "layer:state-borders",
                "source:route",
                "layer:route",
                "marker:origin",
                "marker:destination",
            ]
        );
    }

    #[test]
    fn test_boundary_layers_filter_on_country() {
        let plan = overlay_plan(&MapConfig::default(), &RouteOverlay::sample());
        let OverlayStep::AddLayer(fill) = &plan[1] else {
            panic!("expected fill layer, got {:?}", plan[1]);
        };
        let filter = fill.filter.as_ref().unwrap();
        assert_eq!(
            filter.to_expression(),
            json!(["==", ["get", "iso_3166_1"], "US"])
        );
        assert!(filter.matches(&json!({"iso_3166_1": "US", "name": "Ohio"})));
        assert!(!filter.matches(&json!({"iso_3166_1": "CA"})));
        assert_eq!(fill.source_layer.as_deref(), Some("boundaries_admin_1"));
    }

    #[test]
    fn test_step_serializes_with_op_tag() {
        let step = OverlayStep::AddSource {
            id: "states".into(),
            source: SourceSpec::Vector {
                url: "mapbox://mapbox.boundaries-adm1-v3".into(),
            },
        };
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["op"], "add_source");
        assert_eq!(value["source"]["type"], "vector");
    }
}
