//! Slippy-map engine (walkers, OpenStreetMap tiles) behind the `MapEngine` seam.
//!
//! The viewport keeps whatever sources, layers and markers the composer adds and
//! draws the GeoJSON line layers, the markers and the navigable bounds with a
//! walkers [`Plugin`]. Vector tile sources are accepted but not drawn: the tile
//! basemap already shows state borders.

use std::collections::HashMap;

use egui::{Color32, Pos2, Shape, Stroke, Ui};
use tracing::{debug, warn};
use walkers::sources::OpenStreetMap;
use walkers::{lon_lat, HttpTiles, Map, MapMemory, Plugin, Position, Projector};

use loaddesk_core::map::{
    line_coordinates, EngineViewport, LayerPaint, LayerSpec, LoadNotifier, MapEngine, MarkerSpec,
    SourceSpec, ViewportOptions,
};
use loaddesk_core::{Bounds, Error, LonLat, Result};

const MARKER_COLOR: Color32 = Color32::from_rgb(37, 99, 235);
const BOUNDS_COLOR: Color32 = Color32::from_rgb(160, 160, 160);

fn position(p: LonLat) -> Position {
    lon_lat(p.lon, p.lat)
}

/// Parse `#rrggbb`.
fn parse_color(hex: &str) -> Option<Color32> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Hold `memory` inside the viewport limits: zoom no lower than `min_zoom`, and
/// a view panned outside the bounds snaps back to the center. Returns whether
/// anything was adjusted.
fn constrain(memory: &mut MapMemory, options: &ViewportOptions) -> bool {
    let mut adjusted = false;
    if memory.zoom() < options.min_zoom {
        if memory.set_zoom(options.min_zoom).is_ok() {
            adjusted = true;
        } else {
            warn!(min_zoom = options.min_zoom, "min zoom is outside the tile range");
        }
    }
    if let Some(detached) = memory.detached() {
        let at = LonLat::new(detached.x(), detached.y());
        if !options.bounds.contains(at) {
            debug!(lon = at.lon, lat = at.lat, "panned outside bounds; recentering");
            memory.follow_my_position();
            adjusted = true;
        }
    }
    adjusted
}

/// Map engine rendering into the egui context it is created with.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkersEngine;

impl MapEngine for WalkersEngine {
    type Container = egui::Context;
    type Viewport = WalkersViewport;

    fn create_viewport(
        &self,
        ctx: &egui::Context,
        options: &ViewportOptions,
        notifier: LoadNotifier,
    ) -> Result<WalkersViewport> {
        let mut memory = MapMemory::default();
        memory.set_zoom(options.zoom).map_err(|_| Error::Engine {
            operation: "create viewport",
            reason: format!("zoom {} is outside the tile range", options.zoom),
        })?;

        Ok(WalkersViewport {
            tiles: HttpTiles::new(OpenStreetMap, ctx.clone()),
            memory,
            options: options.clone(),
            sources: HashMap::new(),
            layers: Vec::new(),
            markers: Vec::new(),
            notifier: Some(notifier),
            removed: false,
        })
    }
}

/// Persistent viewport state (survives between frames).
pub struct WalkersViewport {
    tiles: HttpTiles,
    memory: MapMemory,
    options: ViewportOptions,
    sources: HashMap<String, SourceSpec>,
    layers: Vec<LayerSpec>,
    markers: Vec<MarkerSpec>,
    /// Fired after the first rendered frame.
    notifier: Option<LoadNotifier>,
    removed: bool,
}

impl WalkersViewport {
    /// Render one frame, then hold zoom and center inside the configured limits.
    pub fn show(&mut self, ui: &mut Ui) {
        if self.removed {
            return;
        }

        let overlay = OverlayPlugin {
            lines: self.route_lines(),
            markers: self.markers.clone(),
            bounds: self.options.bounds,
        };
        let center = position(self.options.center);
        let map = Map::new(Some(&mut self.tiles), &mut self.memory, center).with_plugin(overlay);
        ui.add(map);

        constrain(&mut self.memory, &self.options);

        if let Some(notifier) = self.notifier.take() {
            debug!("first map frame rendered");
            notifier.loaded();
        }
    }

    pub fn zoom(&self) -> f64 {
        self.memory.zoom()
    }

    /// Re-center on the configured center.
    pub fn recenter(&mut self) {
        self.memory.follow_my_position();
    }

    /// Line layers backed by GeoJSON line sources, ready to paint.
    fn route_lines(&self) -> Vec<RouteLine> {
        self.layers
            .iter()
            .filter_map(|layer| {
                let LayerPaint::Line { color, width, .. } = &layer.paint else {
                    return None;
                };
                let SourceSpec::GeoJson { data } = self.sources.get(&layer.source)? else {
                    return None;
                };
                Some(RouteLine {
                    points: line_coordinates(data)?,
                    stroke: Stroke::new(*width as f32, parse_color(color).unwrap_or(MARKER_COLOR)),
                })
            })
            .collect()
    }

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.removed {
            return Err(Error::Engine {
                operation,
                reason: "viewport was removed".to_string(),
            });
        }
        Ok(())
    }
}

impl EngineViewport for WalkersViewport {
    fn add_source(&mut self, id: &str, source: &SourceSpec) -> Result<()> {
        self.ensure_live("add source")?;
        if self.sources.contains_key(id) {
            return Err(Error::Engine {
                operation: "add source",
                reason: format!("source '{}' already exists", id),
            });
        }
        if let SourceSpec::Vector { url } = source {
            debug!(id, url = %url, "vector source kept but not drawn");
        }
        self.sources.insert(id.to_string(), source.clone());
        Ok(())
    }

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<()> {
        self.ensure_live("add layer")?;
        if !self.sources.contains_key(&layer.source) {
            return Err(Error::Engine {
                operation: "add layer",
                reason: format!("layer '{}' references unknown source '{}'", layer.id, layer.source),
            });
        }
        self.layers.push(layer.clone());
        Ok(())
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()> {
        self.ensure_live("add marker")?;
        self.markers.push(marker.clone());
        Ok(())
    }

    fn remove(&mut self) {
        self.removed = true;
        self.notifier = None;
        self.sources.clear();
        self.layers.clear();
        self.markers.clear();
    }
}

struct RouteLine {
    points: Vec<LonLat>,
    stroke: Stroke,
}

/// Plugin that draws the bounds outline, route lines and endpoint markers.
struct OverlayPlugin {
    lines: Vec<RouteLine>,
    markers: Vec<MarkerSpec>,
    bounds: Bounds,
}

impl Plugin for OverlayPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        _response: &egui::Response,
        projector: &Projector,
    ) {
        let project = |p: LonLat| {
            let v = projector.project(position(p));
            Pos2::new(v.x, v.y)
        };
        let painter = ui.painter();

        let sw = self.bounds.south_west;
        let ne = self.bounds.north_east;
        let corners = [
            LonLat::new(sw.lon, sw.lat),
            LonLat::new(ne.lon, sw.lat),
            LonLat::new(ne.lon, ne.lat),
            LonLat::new(sw.lon, ne.lat),
        ];
        painter.add(Shape::closed_line(
            corners.into_iter().map(project).collect(),
            Stroke::new(1.0, BOUNDS_COLOR),
        ));

        for line in &self.lines {
            painter.add(Shape::line(
                line.points.iter().copied().map(project).collect(),
                line.stroke,
            ));
        }

        for marker in &self.markers {
            painter.circle(
                project(marker.position),
                6.0,
                MARKER_COLOR,
                Stroke::new(2.0, Color32::WHITE),
            );
        }
    }
}
