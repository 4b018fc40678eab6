//! # LoadDesk Core
//!
//! Core types and pipelines behind the LoadDesk load-draft dashboard.
//!
//! This crate provides:
//! - `source` / `dedup`: fetch the driver/carrier feed and collapse it into
//!   unique, ordered selection lists
//! - `map`: viewport configuration, the map engine seam, and the composer that
//!   adds boundary, route and marker overlays once the engine has loaded
//! - `geo`: lon/lat primitives and the continental US extent
//!
//! ## Features
//!
//! - `native` (default): async file/HTTP fetch via `tokio` + `reqwest`, plus
//!   `source::blocking` wrappers

pub mod dedup;
pub mod error;
pub mod geo;
pub mod map;
pub mod ordered;
pub mod record;
pub mod source;

pub use dedup::{deduplicate, Directory};
pub use error::{Error, Result};
pub use geo::{Bounds, LonLat};
pub use record::{Carrier, Driver, Keyed, RawRecord};
pub use source::TabularSource;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dedup::{deduplicate, Directory};
    pub use crate::error::{Error, Result};
    pub use crate::geo::{Bounds, LonLat};
    pub use crate::map::{
        ComposerState, EngineViewport, MapComposer, MapConfig, MapEngine, RouteOverlay,
        ViewportHandle, WaypointSource,
    };
    pub use crate::record::{Carrier, Driver, Keyed, RawRecord};
    pub use crate::source::TabularSource;
}
