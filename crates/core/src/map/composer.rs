//! Viewport lifecycle and overlay composition.
//!
//! A [`ViewportHandle`] owns at most one engine viewport. The [`MapComposer`]
//! drives it through
//! `Uninitialized -> Initializing -> Ready -> TornDown`:
//!
//! * [`MapComposer::initialize`] / [`MapComposer::mount`] construct the viewport
//!   (a no-op when the handle already owns one);
//! * [`MapComposer::compose`] (async) or [`MapComposer::poll_compose`]
//!   (non-blocking) wait for the engine's load signal and then add the overlays
//!   in their fixed order;
//! * [`MapComposer::teardown`] releases the viewport. Dropping the handle does
//!   the same.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::config::{MapConfig, ViewportOptions};
use super::engine::{load_channel, EngineViewport, LoadSignal, MapEngine};
use super::overlay::{boundary_steps, route_steps, OverlayStep};
use super::route::{FixedWaypoints, WaypointSource};

/// Lifecycle state of a [`ViewportHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Uninitialized,
    /// Viewport constructed, waiting for the engine to load.
    Initializing,
    /// Overlays added.
    Ready,
    TornDown,
}

/// Exclusive owner of one engine viewport for a mounted view.
pub struct ViewportHandle<V: EngineViewport> {
    instance: Option<V>,
    signal: Option<LoadSignal>,
    state: ComposerState,
    /// Options the live instance was constructed with.
    options: Option<ViewportOptions>,
    /// Overlay steps applied to the live instance, in order.
    overlays: Vec<String>,
    /// Number of viewports this handle has constructed.
    generation: u64,
}

impl<V: EngineViewport> Default for ViewportHandle<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: EngineViewport> ViewportHandle<V> {
    /// An empty handle, ready for [`MapComposer::mount`].
    pub fn new() -> Self {
        Self {
            instance: None,
            signal: None,
            state: ComposerState::Uninitialized,
            options: None,
            overlays: Vec::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Whether an engine viewport is currently held.
    pub fn is_live(&self) -> bool {
        self.instance.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.state == ComposerState::Ready
    }

    pub fn viewport(&self) -> Option<&V> {
        self.instance.as_ref()
    }

    pub fn viewport_mut(&mut self) -> Option<&mut V> {
        self.instance.as_mut()
    }

    pub fn options(&self) -> Option<&ViewportOptions> {
        self.options.as_ref()
    }

    pub fn overlays(&self) -> &[String] {
        &self.overlays
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Release the engine viewport, if any. Returns whether one was released.
    fn release(&mut self) -> bool {
        self.signal = None;
        self.options = None;
        self.overlays.clear();
        match self.instance.take() {
            Some(mut viewport) => {
                viewport.remove();
                self.state = ComposerState::TornDown;
                true
            }
            None => false,
        }
    }
}

impl<V: EngineViewport> Drop for ViewportHandle<V> {
    fn drop(&mut self) {
        if self.release() {
            debug!("viewport released on drop");
        }
    }
}

impl<V: EngineViewport> std::fmt::Debug for ViewportHandle<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportHandle")
            .field("state", &self.state)
            .field("live", &self.instance.is_some())
            .field("overlays", &self.overlays)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Configures viewports on an engine and composes their overlays.
pub struct MapComposer<E: MapEngine, W: WaypointSource = FixedWaypoints> {
    engine: E,
    config: MapConfig,
    waypoints: W,
}

impl<E: MapEngine> MapComposer<E> {
    /// Composer drawing the illustrative fixed route.
    pub fn new(engine: E, config: MapConfig) -> Self {
        Self::with_waypoints(engine, config, FixedWaypoints::default())
    }
}

impl<E: MapEngine, W: WaypointSource> MapComposer<E, W> {
    pub fn with_waypoints(engine: E, config: MapConfig, waypoints: W) -> Self {
        Self {
            engine,
            config,
            waypoints,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn waypoints(&self) -> &W {
        &self.waypoints
    }

    /// Construct a viewport in a fresh handle.
    pub fn initialize(
        &self,
        container: Option<&E::Container>,
    ) -> Result<ViewportHandle<E::Viewport>> {
        let mut handle = ViewportHandle::new();
        self.mount(&mut handle, container)?;
        Ok(handle)
    }

    /// Construct a viewport into `handle` unless it already owns one.
    ///
    /// Returns `Ok(false)` for the idempotent no-op. A missing container is
    /// reported as [`Error::MissingContainer`] and leaves the handle untouched,
    /// so the call can be retried once the container exists.
    pub fn mount(
        &self,
        handle: &mut ViewportHandle<E::Viewport>,
        container: Option<&E::Container>,
    ) -> Result<bool> {
        if handle.is_live() {
            debug!(state = ?handle.state, "viewport already initialized; skipping");
            return Ok(false);
        }
        let container = container.ok_or(Error::MissingContainer)?;
        let options = &self.config.viewport;
        options.validate()?;

        let (notifier, signal) = load_channel();
        let viewport = self.engine.create_viewport(container, options, notifier)?;

        handle.instance = Some(viewport);
        handle.signal = Some(signal);
        handle.options = Some(options.clone());
        handle.overlays.clear();
        handle.state = ComposerState::Initializing;
        handle.generation += 1;

        info!(
            generation = handle.generation,
            zoom = options.zoom,
            min_zoom = options.min_zoom,
            "viewport initialized"
        );
        Ok(true)
    }

    /// Wait for the engine to load, then add the overlays.
    ///
    /// On a load failure no overlay is added and [`Error::EngineLoad`] is
    /// returned; the handle can still be torn down and mounted again. Dropping
    /// the returned future before it completes leaves the load signal in the
    /// handle, so a later `compose` or `poll_compose` picks it up.
    pub async fn compose(&self, handle: &mut ViewportHandle<E::Viewport>) -> Result<()> {
        let outcome = match (handle.state, handle.signal.as_mut()) {
            (ComposerState::Initializing, Some(signal)) => signal.await,
            (actual, _) => {
                return Err(Error::InvalidState {
                    operation: "compose overlays",
                    actual,
                })
            }
        };
        handle.signal = None;
        self.finish(handle, outcome)
    }

    /// Non-blocking variant of [`compose`](Self::compose) for frame loops.
    ///
    /// Returns `Ok(false)` while the engine is still loading and `Ok(true)` once
    /// the overlays are in place.
    pub fn poll_compose(&self, handle: &mut ViewportHandle<E::Viewport>) -> Result<bool> {
        if handle.state == ComposerState::Ready {
            return Ok(true);
        }
        let Some(signal) = handle.signal.as_mut() else {
            return Err(Error::InvalidState {
                operation: "compose overlays",
                actual: handle.state,
            });
        };
        match signal.try_loaded() {
            None => Ok(false),
            Some(outcome) => {
                handle.signal = None;
                self.finish(handle, outcome).map(|_| true)
            }
        }
    }

    /// Release the handle's viewport. Safe in any state.
    pub fn teardown(&self, handle: &mut ViewportHandle<E::Viewport>) {
        let prior = handle.state;
        if handle.release() {
            info!(from = ?prior, "viewport torn down");
        } else {
            debug!(state = ?prior, "teardown with no live viewport");
        }
    }

    fn finish(&self, handle: &mut ViewportHandle<E::Viewport>, outcome: Result<()>) -> Result<()> {
        if let Err(e) = outcome {
            warn!(error = %e, "map engine did not load; overlays not added");
            return Err(e);
        }

        let mut steps = boundary_steps(&self.config);
        match self.waypoints.route() {
            Some(route) => steps.extend(route_steps(&self.config, &route)),
            None => debug!("no route waypoints; drawing boundaries only"),
        }

        let Some(viewport) = handle.instance.as_mut() else {
            return Err(Error::InvalidState {
                operation: "compose overlays",
                actual: handle.state,
            });
        };
        for step in &steps {
            if let Err(e) = apply_step(viewport, step) {
                // What the engine already holds is discarded with the viewport.
                warn!(step = %step.describe(), error = %e, "overlay rejected; tear down to retry");
                handle.overlays.clear();
                return Err(e);
            }
            debug!(step = %step.describe(), "overlay added");
            handle.overlays.push(step.describe());
        }

        handle.state = ComposerState::Ready;
        info!(overlays = handle.overlays.len(), "map composed");
        Ok(())
    }
}

fn apply_step<V: EngineViewport>(viewport: &mut V, step: &OverlayStep) -> Result<()> {
    match step {
        OverlayStep::AddSource { id, source } => viewport.add_source(id, source),
        OverlayStep::AddLayer(layer) => viewport.add_layer(layer),
        OverlayStep::AddMarker(marker) => viewport.add_marker(marker),
    }
}
