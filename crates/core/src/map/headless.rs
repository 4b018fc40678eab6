//! In-memory map engine that records every call.
//!
//! Used by the CLI `plan` command to print the engine call sequence and by
//! tests to assert lifecycle properties (live instance counts, call order).

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;

use crate::error::{Error, Result};

use super::config::ViewportOptions;
use super::engine::{EngineViewport, LoadNotifier, MapEngine};
use super::overlay::{LayerSpec, MarkerSpec, SourceSpec};

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum EngineCall {
    Create {
        viewport: u64,
        container: String,
        options: ViewportOptions,
    },
    AddSource {
        viewport: u64,
        id: String,
        source: SourceSpec,
    },
    AddLayer {
        viewport: u64,
        layer: LayerSpec,
    },
    AddMarker {
        viewport: u64,
        marker: MarkerSpec,
    },
    Remove {
        viewport: u64,
    },
}

/// When constructed viewports report "loaded".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadBehavior {
    /// Immediately on construction.
    #[default]
    Immediate,
    /// When [`HeadlessEngine::finish_loading`] is called.
    Deferred,
    /// Never; the load fails with the given reason.
    Fail(String),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<EngineCall>,
    created: u64,
    live: usize,
    pending: Vec<LoadNotifier>,
}

/// Recording engine. Clones share the same call log.
#[derive(Clone, Default)]
pub struct HeadlessEngine {
    recorder: Rc<RefCell<Recorder>>,
    behavior: LoadBehavior,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: LoadBehavior) -> Self {
        Self {
            recorder: Rc::default(),
            behavior,
        }
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.recorder.borrow().calls.clone()
    }

    /// Viewports constructed and not yet removed.
    pub fn live_viewports(&self) -> usize {
        self.recorder.borrow().live
    }

    /// Viewports constructed over the engine's lifetime.
    pub fn created_viewports(&self) -> u64 {
        self.recorder.borrow().created
    }

    /// Report "loaded" for every deferred viewport. Returns how many were notified.
    pub fn finish_loading(&self) -> usize {
        let pending = std::mem::take(&mut self.recorder.borrow_mut().pending);
        let n = pending.len();
        pending.into_iter().for_each(LoadNotifier::loaded);
        n
    }

    /// Report a load failure for every deferred viewport.
    pub fn fail_loading(&self, reason: &str) -> usize {
        let pending = std::mem::take(&mut self.recorder.borrow_mut().pending);
        let n = pending.len();
        for notifier in pending {
            notifier.failed(reason);
        }
        n
    }
}

impl MapEngine for HeadlessEngine {
    type Container = str;
    type Viewport = HeadlessViewport;

    fn create_viewport(
        &self,
        container: &str,
        options: &ViewportOptions,
        notifier: LoadNotifier,
    ) -> Result<HeadlessViewport> {
        if container.is_empty() {
            return Err(Error::Engine {
                operation: "create viewport",
                reason: "container id is empty".to_string(),
            });
        }

        let mut rec = self.recorder.borrow_mut();
        rec.created += 1;
        rec.live += 1;
        let id = rec.created;
        rec.calls.push(EngineCall::Create {
            viewport: id,
            container: container.to_string(),
            options: options.clone(),
        });

        match &self.behavior {
            LoadBehavior::Immediate => notifier.loaded(),
            LoadBehavior::Deferred => rec.pending.push(notifier),
            LoadBehavior::Fail(reason) => notifier.failed(reason.clone()),
        }

        Ok(HeadlessViewport {
            id,
            recorder: Rc::clone(&self.recorder),
            sources: HashSet::new(),
            markers: 0,
            removed: false,
        })
    }
}

/// A viewport of the [`HeadlessEngine`].
pub struct HeadlessViewport {
    id: u64,
    recorder: Rc<RefCell<Recorder>>,
    sources: HashSet<String>,
    markers: usize,
    removed: bool,
}

impl HeadlessViewport {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn marker_count(&self) -> usize {
        self.markers
    }

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.removed {
            return Err(Error::Engine {
                operation,
                reason: format!("viewport {} was removed", self.id),
            });
        }
        Ok(())
    }

    fn record(&self, call: EngineCall) {
        self.recorder.borrow_mut().calls.push(call);
    }
}

impl EngineViewport for HeadlessViewport {
    fn add_source(&mut self, id: &str, source: &SourceSpec) -> Result<()> {
        self.ensure_live("add source")?;
        if !self.sources.insert(id.to_string()) {
            return Err(Error::Engine {
                operation: "add source",
                reason: format!("source '{}' already exists", id),
            });
        }
        self.record(EngineCall::AddSource {
            viewport: self.id,
            id: id.to_string(),
            source: source.clone(),
        });
        Ok(())
    }

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<()> {
        self.ensure_live("add layer")?;
        if !self.sources.contains(&layer.source) {
            return Err(Error::Engine {
                operation: "add layer",
                reason: format!("layer '{}' references unknown source '{}'", layer.id, layer.source),
            });
        }
        self.record(EngineCall::AddLayer {
            viewport: self.id,
            layer: layer.clone(),
        });
        Ok(())
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()> {
        self.ensure_live("add marker")?;
        self.markers += 1;
        self.record(EngineCall::AddMarker {
            viewport: self.id,
            marker: marker.clone(),
        });
        Ok(())
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        let mut rec = self.recorder.borrow_mut();
        rec.live = rec.live.saturating_sub(1);
        rec.calls.push(EngineCall::Remove { viewport: self.id });
    }
}
