//! Seams to the external map rendering engine.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::error::{Error, Result};

use super::config::ViewportOptions;
use super::overlay::{LayerSpec, MarkerSpec, SourceSpec};

/// A map rendering engine able to construct viewports.
pub trait MapEngine {
    /// What the viewport is mounted into (a DOM node, a UI context, ...).
    type Container: ?Sized;
    type Viewport: EngineViewport;

    /// Construct a viewport. The engine fires `notifier` once it has loaded,
    /// or reports failure through it.
    fn create_viewport(
        &self,
        container: &Self::Container,
        options: &ViewportOptions,
        notifier: LoadNotifier,
    ) -> Result<Self::Viewport>;
}

/// A live engine viewport.
pub trait EngineViewport {
    fn add_source(&mut self, id: &str, source: &SourceSpec) -> Result<()>;

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<()>;

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()>;

    /// Release engine resources. Called exactly once per viewport.
    fn remove(&mut self);
}

type LoadOutcome = std::result::Result<(), String>;

/// Engine side of the load signal.
#[derive(Debug)]
pub struct LoadNotifier {
    tx: oneshot::Sender<LoadOutcome>,
}

impl LoadNotifier {
    /// The engine finished loading; overlays may be added.
    pub fn loaded(self) {
        // The receiver is gone when the viewport was torn down first.
        let _ = self.tx.send(Ok(()));
    }

    /// The engine will never become ready.
    pub fn failed(self, reason: impl Into<String>) {
        let _ = self.tx.send(Err(reason.into()));
    }
}

/// Composer side of the load signal. Resolves once the engine reports.
///
/// Dropping the [`LoadNotifier`] without reporting counts as a failure.
#[derive(Debug)]
pub struct LoadSignal {
    rx: oneshot::Receiver<LoadOutcome>,
}

impl LoadSignal {
    /// Non-blocking check, for immediate-mode UI loops.
    ///
    /// `None` while the engine is still loading.
    pub fn try_loaded(&mut self) -> Option<Result<()>> {
        match self.rx.try_recv() {
            Ok(None) => None,
            Ok(Some(outcome)) => Some(outcome.map_err(Error::EngineLoad)),
            Err(oneshot::Canceled) => Some(Err(dropped())),
        }
    }
}

impl Future for LoadSignal {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|res| match res {
            Ok(outcome) => outcome.map_err(Error::EngineLoad),
            Err(oneshot::Canceled) => Err(dropped()),
        })
    }
}

fn dropped() -> Error {
    Error::EngineLoad("engine dropped the load notifier without reporting".to_string())
}

/// A connected notifier/signal pair.
pub fn load_channel() -> (LoadNotifier, LoadSignal) {
    let (tx, rx) = oneshot::channel();
    (LoadNotifier { tx }, LoadSignal { rx })
}
