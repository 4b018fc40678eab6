//! Map viewport composition: configuration, engine seams, overlays and lifecycle.

pub mod composer;
pub mod config;
pub mod engine;
pub mod headless;
pub mod overlay;
pub mod route;

pub use composer::{ComposerState, MapComposer, ViewportHandle};
pub use config::{BoundaryStyle, MapConfig, RouteStyle, ViewportOptions};
pub use engine::{load_channel, EngineViewport, LoadNotifier, LoadSignal, MapEngine};
pub use headless::{EngineCall, HeadlessEngine, HeadlessViewport, LoadBehavior};
pub use overlay::{
    overlay_plan, LayerPaint, LayerSpec, MarkerRole, MarkerSpec, OverlayStep, PropertyFilter,
    SourceSpec,
};
pub use route::{line_coordinates, FixedWaypoints, RouteOverlay, WaypointSource};
