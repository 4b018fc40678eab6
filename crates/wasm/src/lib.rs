//! WebAssembly bindings for LoadDesk.
//!
//! For browser hosts that fetch the record feed and drive a JavaScript map
//! engine themselves. Inputs are plain strings; outputs are JSON strings.

use wasm_bindgen::prelude::*;

use loaddesk_core::map::{overlay_plan as compose_plan, MapConfig, RouteOverlay};
use loaddesk_core::{deduplicate, source, LonLat};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse CSV text and return `{"drivers": [...], "carriers": [...]}`.
///
/// Rows missing an id or name for an entity type contribute nothing for that
/// type. An unreadable header line is an error.
#[wasm_bindgen(js_name = directoryFromCsv)]
pub fn directory_from_csv(csv_text: &str) -> Result<String, JsValue> {
    let rows = source::parse_str(csv_text).map_err(js_err)?;
    serde_json::to_string(&deduplicate(&rows)).map_err(js_err)
}

/// Return `{"viewport": {...}, "steps": [...]}`: the viewport options and the
/// ordered overlay calls to replay once the engine has loaded.
///
/// `config_json` may be empty for the defaults. `origin`/`destination` are
/// `"lon,lat"` strings; when either is empty the sample route is used.
#[wasm_bindgen(js_name = overlayPlan)]
pub fn overlay_plan(config_json: &str, origin: &str, destination: &str) -> Result<String, JsValue> {
    let config = if config_json.trim().is_empty() {
        MapConfig::default()
    } else {
        MapConfig::from_json(config_json).map_err(js_err)?
    };

    let route = if origin.is_empty() || destination.is_empty() {
        RouteOverlay::sample()
    } else {
        let origin: LonLat = origin.parse().map_err(js_err)?;
        let destination: LonLat = destination.parse().map_err(js_err)?;
        RouteOverlay::new(origin, destination)
    };

    let plan = serde_json::json!({
        "viewport": config.viewport,
        "steps": compose_plan(&config, &route),
    });
    serde_json::to_string(&plan).map_err(js_err)
}
