//! Viewport lifecycle and overlay composition against the headless engine.

use futures::executor::block_on;
use futures::FutureExt;

use loaddesk_core::map::{
    ComposerState, EngineCall, HeadlessEngine, LoadBehavior, MapComposer, MapConfig, MarkerRole,
    RouteOverlay, ViewportHandle,
};
use loaddesk_core::{Error, LonLat};

fn composer(engine: &HeadlessEngine) -> MapComposer<HeadlessEngine> {
    MapComposer::new(engine.clone(), MapConfig::default())
}

fn call_names(calls: &[EngineCall]) -> Vec<String> {
    calls
        .iter()
        .map(|c| match c {
            EngineCall::Create { .. } => "create".to_string(),
            EngineCall::AddSource { id, .. } => format!("source:{}", id),
            EngineCall::AddLayer { layer, .. } => format!("layer:{}", layer.id),
            EngineCall::AddMarker { marker, .. } => format!("marker:{:?}", marker.role),
            EngineCall::Remove { .. } => "remove".to_string(),
        })
        .collect()
}

#[test]
fn test_initialize_then_compose_adds_overlays_in_order() {
    let engine = HeadlessEngine::new();
    let composer = composer(&engine);

    let mut handle = composer.initialize(Some("map")).unwrap();
    assert_eq!(handle.state(), ComposerState::Initializing);

    block_on(composer.compose(&mut handle)).unwrap();
    assert_eq!(handle.state(), ComposerState::Ready);
    assert_eq!(handle.viewport().map(|v| v.marker_count()), Some(2));
    assert_eq!(
        call_names(&engine.calls()),
        [
            "create",
            "source:states",
            "layer:state-fills",
            "layer:state-borders",
            "source:route",
            "layer:route",
            "marker:Origin",
            "marker:Destination",
        ]
    );
}

#[test]
fn test_double_initialize_is_idempotent() {
    let engine = HeadlessEngine::new();
    let composer = composer(&engine);

    let mut handle = composer.initialize(Some("map")).unwrap();
    let created = composer.mount(&mut handle, Some("map")).unwrap();

    assert!(!created);
    assert_eq!(engine.created_viewports(), 1);
    assert_eq!(engine.live_viewports(), 1);
    assert_eq!(handle.generation(), 1);
}

#[test]
fn test_teardown_then_reinitialize_uses_same_configuration() {
    let engine = HeadlessEngine::new();
    let composer = composer(&engine);

    let mut handle = composer.initialize(Some("map")).unwrap();
    block_on(composer.compose(&mut handle)).unwrap();
    let first = handle.options().cloned().unwrap();

    composer.teardown(&mut handle);
    assert_eq!(handle.state(), ComposerState::TornDown);
    assert!(!handle.is_live());
    assert!(handle.overlays().is_empty());
    assert_eq!(engine.live_viewports(), 0);

    assert!(composer.mount(&mut handle, Some("map")).unwrap());
    block_on(composer.compose(&mut handle)).unwrap();
    let second = handle.options().cloned().unwrap();

    assert_eq!(engine.created_viewports(), 2);
    assert_eq!(engine.live_viewports(), 1);
    assert_eq!(handle.generation(), 2);
    assert_eq!(first, second);

    let creates: Vec<_> = engine
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            EngineCall::Create { viewport, options, .. } => Some((viewport, options)),
            _ => None,
        })
        .collect();
    assert_eq!(creates.len(), 2);
    assert_ne!(creates[0].0, creates[1].0);
    assert_eq!(creates[0].1.bounds, creates[1].1.bounds);
    assert_eq!(creates[0].1.zoom, creates[1].1.zoom);
    assert_eq!(creates[0].1.min_zoom, creates[1].1.min_zoom);
}

#[test]
fn test_missing_container_is_retryable() {
    let engine = HeadlessEngine::new();
    let composer = composer(&engine);
    let mut handle = ViewportHandle::new();

    let err = composer.mount(&mut handle, None).unwrap_err();
    assert!(matches!(err, Error::MissingContainer));
    assert!(err.is_retryable());
    assert_eq!(handle.state(), ComposerState::Uninitialized);
    assert_eq!(engine.created_viewports(), 0);

    assert!(composer.mount(&mut handle, Some("map")).unwrap());
    assert_eq!(handle.state(), ComposerState::Initializing);
}

#[test]
fn test_overlays_wait_for_load_signal() {
    let engine = HeadlessEngine::with_behavior(LoadBehavior::Deferred);
    let composer = composer(&engine);
    let mut handle = composer.initialize(Some("map")).unwrap();

    assert!(!composer.poll_compose(&mut handle).unwrap());
    assert_eq!(call_names(&engine.calls()), ["create"]);

    assert_eq!(engine.finish_loading(), 1);
    assert!(composer.poll_compose(&mut handle).unwrap());
    assert!(handle.is_ready());
    assert_eq!(handle.overlays().len(), 7);

    // Already composed: polling again adds nothing.
    assert!(composer.poll_compose(&mut handle).unwrap());
    assert_eq!(engine.calls().len(), 8);
}

#[test]
fn test_engine_load_failure_is_recoverable() {
    let engine = HeadlessEngine::with_behavior(LoadBehavior::Fail("style missing".into()));
    let composer = composer(&engine);
    let mut handle = composer.initialize(Some("map")).unwrap();

    let err = block_on(composer.compose(&mut handle)).unwrap_err();
    assert!(matches!(err, Error::EngineLoad(ref r) if r == "style missing"));
    assert!(handle.overlays().is_empty());
    assert_eq!(handle.state(), ComposerState::Initializing);

    // A second compose has no signal left to wait on.
    assert!(matches!(
        block_on(composer.compose(&mut handle)),
        Err(Error::InvalidState { .. })
    ));

    composer.teardown(&mut handle);
    assert_eq!(engine.live_viewports(), 0);
}

#[test]
fn test_teardown_before_load_releases_engine() {
    let engine = HeadlessEngine::with_behavior(LoadBehavior::Deferred);
    let composer = composer(&engine);
    let mut handle = composer.initialize(Some("map")).unwrap();

    composer.teardown(&mut handle);
    assert_eq!(engine.live_viewports(), 0);
    // Notifying after teardown is harmless.
    assert_eq!(engine.finish_loading(), 1);
    assert!(matches!(
        composer.poll_compose(&mut handle),
        Err(Error::InvalidState {
            actual: ComposerState::TornDown,
            ..
        })
    ));
}

#[test]
fn test_dropping_handle_releases_viewport() {
    let engine = HeadlessEngine::new();
    let composer = composer(&engine);
    {
        let _handle = composer.initialize(Some("map")).unwrap();
        assert_eq!(engine.live_viewports(), 1);
    }
    assert_eq!(engine.live_viewports(), 0);
    assert!(matches!(engine.calls().last(), Some(EngineCall::Remove { .. })));
}

#[test]
fn test_custom_waypoints() {
    let engine = HeadlessEngine::new();
    let chicago = LonLat::new(-87.6298, 41.8781);
    let dallas = LonLat::new(-96.797, 32.7767);
    let composer = MapComposer::with_waypoints(engine.clone(), MapConfig::default(), move || {
        Some(RouteOverlay::new(chicago, dallas))
    });

    let mut handle = composer.initialize(Some("map")).unwrap();
    block_on(composer.compose(&mut handle)).unwrap();

    let markers: Vec<_> = engine
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            EngineCall::AddMarker { marker, .. } => Some((marker.role, marker.position)),
            _ => None,
        })
        .collect();
    assert_eq!(
        markers,
        vec![(MarkerRole::Origin, chicago), (MarkerRole::Destination, dallas)]
    );
}

#[test]
fn test_no_waypoints_draws_boundaries_only() {
    let engine = HeadlessEngine::new();
    let composer =
        MapComposer::with_waypoints(engine.clone(), MapConfig::default(), || -> Option<RouteOverlay> {
            None
        });

    let mut handle = composer.initialize(Some("map")).unwrap();
    block_on(composer.compose(&mut handle)).unwrap();
    assert_eq!(
        handle.overlays(),
        ["source:states", "layer:state-fills", "layer:state-borders"]
    );
}

#[test]
fn test_invalid_viewport_config_is_rejected() {
    let engine = HeadlessEngine::new();
    let mut config = MapConfig::default();
    config.viewport.center = LonLat::new(0.0, 0.0);
    let composer = MapComposer::new(engine.clone(), config);

    let err = composer.initialize(Some("map")).unwrap_err();
    assert!(matches!(err, Error::InvalidViewport { field: "center", .. }));
    assert_eq!(engine.created_viewports(), 0);
}

#[test]
fn test_retry_after_load_failure_needs_teardown() {
    let engine = HeadlessEngine::with_behavior(LoadBehavior::Deferred);
    let composer = composer(&engine);
    let mut handle = composer.initialize(Some("map")).unwrap();

    engine.fail_loading("tiles unreachable");
    let err = composer.poll_compose(&mut handle).unwrap_err();
    assert!(err.is_retryable());

    // The failed viewport is still owned, so mounting again does nothing.
    assert!(!composer.mount(&mut handle, Some("map")).unwrap());
    assert_eq!(handle.state(), ComposerState::Initializing);
    assert_eq!(engine.created_viewports(), 1);

    composer.teardown(&mut handle);
    assert!(composer.mount(&mut handle, Some("map")).unwrap());
    engine.finish_loading();
    assert!(composer.poll_compose(&mut handle).unwrap());
    assert_eq!(engine.created_viewports(), 2);
    assert_eq!(engine.live_viewports(), 1);
}

#[test]
fn test_dropped_compose_keeps_load_signal() {
    let engine = HeadlessEngine::with_behavior(LoadBehavior::Deferred);
    let composer = composer(&engine);
    let mut handle = composer.initialize(Some("map")).unwrap();

    // Still loading: the future is pending and gets dropped.
    assert!(composer.compose(&mut handle).now_or_never().is_none());
    assert_eq!(handle.state(), ComposerState::Initializing);

    engine.finish_loading();
    block_on(composer.compose(&mut handle)).unwrap();
    assert!(handle.is_ready());
    assert_eq!(handle.overlays().len(), 7);
}

#[test]
fn test_rejected_overlay_leaves_no_partial_record() {
    let engine = HeadlessEngine::new();
    let mut config = MapConfig::default();
    // The route source collides with the boundary source.
    config.route.source_id = config.boundary.source_id.clone();
    let composer = MapComposer::new(engine.clone(), config);
    let mut handle = composer.initialize(Some("map")).unwrap();

    let err = block_on(composer.compose(&mut handle)).unwrap_err();
    assert!(matches!(err, Error::Engine { operation: "add source", .. }));
    assert!(handle.overlays().is_empty());
    assert_eq!(handle.state(), ComposerState::Initializing);

    composer.teardown(&mut handle);
    assert_eq!(engine.live_viewports(), 0);
}
