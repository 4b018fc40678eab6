//! Route waypoints and their GeoJSON representation.

use geo_types::{Geometry, LineString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::geo::LonLat;

/// An origin/destination pair rendered as one line and two markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteOverlay {
    pub origin: LonLat,
    pub destination: LonLat,
}

/// New York City.
pub const SAMPLE_ORIGIN: LonLat = LonLat::new(-74.006, 40.7128);
/// Los Angeles.
pub const SAMPLE_DESTINATION: LonLat = LonLat::new(-118.2437, 34.0522);

impl RouteOverlay {
    pub fn new(origin: LonLat, destination: LonLat) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Illustrative New York to Los Angeles route.
    pub fn sample() -> Self {
        Self::new(SAMPLE_ORIGIN, SAMPLE_DESTINATION)
    }

    /// Straight line between the two endpoints.
    pub fn line_string(&self) -> LineString<f64> {
        LineString::from(vec![self.origin, self.destination])
    }

    /// GeoJSON `Feature` with an empty property bag and a `LineString` geometry.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": [self.origin.to_array(), self.destination.to_array()],
            }
        })
    }
}

impl From<RouteOverlay> for Geometry<f64> {
    fn from(route: RouteOverlay) -> Self {
        Geometry::LineString(route.line_string())
    }
}

/// Extract the `LineString` coordinates of a GeoJSON Feature or bare geometry.
pub fn line_coordinates(data: &Value) -> Option<Vec<LonLat>> {
    let geometry = match data.get("type").and_then(Value::as_str) {
        Some("Feature") => data.get("geometry")?,
        _ => data,
    };
    if geometry.get("type").and_then(Value::as_str) != Some("LineString") {
        return None;
    }
    geometry
        .get("coordinates")?
        .as_array()?
        .iter()
        .map(|pair| {
            let pair = pair.as_array()?;
            Some(LonLat::new(pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
        })
        .collect()
}

/// Supplies the route shown on the map.
pub trait WaypointSource {
    /// The route to draw, or `None` when there is nothing to show.
    fn route(&self) -> Option<RouteOverlay>;
}

/// A route fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWaypoints(pub RouteOverlay);

impl Default for FixedWaypoints {
    fn default() -> Self {
        Self(RouteOverlay::sample())
    }
}

impl WaypointSource for FixedWaypoints {
    fn route(&self) -> Option<RouteOverlay> {
        Some(self.0)
    }
}

impl<F> WaypointSource for F
where
    F: Fn() -> Option<RouteOverlay>,
{
    fn route(&self) -> Option<RouteOverlay> {
        self()
    }
}
