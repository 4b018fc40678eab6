//! Main application: LoadDeskApp implements eframe::App.

use crossbeam_channel::{Receiver, Sender};
use tracing::{info, warn};

use loaddesk_core::map::{ComposerState, MapComposer, MapConfig, ViewportHandle};
use loaddesk_core::Directory;

use crate::io;
use crate::panels::console::show_console;
use crate::panels::draft_form::{show_draft_form, FormAction};
use crate::panels::map_view::show_map_view;
use crate::render::{WalkersEngine, WalkersViewport};
use crate::state::{AppMessage, LoadDraft, LogEntry};

/// Environment variable naming a JSON map configuration file.
const MAP_CONFIG_ENV: &str = "LOADDESK_MAP_CONFIG";

/// The main application state.
pub struct LoadDeskApp {
    /// Message channels for background thread communication.
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,

    /// Deduplicated selection lists.
    directory: Directory,
    draft: LoadDraft,
    /// A record load is in flight.
    loading: bool,

    /// Console log entries.
    logs: Vec<LogEntry>,
    problems_only: bool,

    composer: MapComposer<WalkersEngine>,
    /// Released when the app is dropped.
    map: ViewportHandle<WalkersViewport>,
    /// Set once the map failed to start; stops per-frame retries.
    map_error: Option<String>,
}

impl LoadDeskApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut logs = vec![LogEntry::info("LoadDesk started")];

        let config = match std::env::var_os(MAP_CONFIG_ENV) {
            Some(path) => match MapConfig::from_json_file(&path) {
                Ok(config) => {
                    logs.push(LogEntry::info(format!(
                        "Map configuration loaded from {}",
                        path.to_string_lossy()
                    )));
                    config
                }
                Err(e) => {
                    warn!(error = %e, "falling back to the default map configuration");
                    logs.push(LogEntry::warning(format!(
                        "Ignoring {}: {}",
                        path.to_string_lossy(),
                        e
                    )));
                    MapConfig::default()
                }
            },
            None => MapConfig::default(),
        };

        io::load_records(io::startup_source(), tx.clone());

        Self {
            tx,
            rx,
            directory: Directory::default(),
            draft: LoadDraft::default(),
            loading: true,
            logs,
            problems_only: false,
            composer: MapComposer::new(WalkersEngine, config),
            map: ViewportHandle::new(),
            map_error: None,
        }
    }

    /// Process pending messages from background threads.
    fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                AppMessage::DirectoryLoaded { source, directory } => {
                    info!(
                        source = %source,
                        carriers = directory.carriers.len(),
                        drivers = directory.drivers.len(),
                        "directory replaced"
                    );
                    self.loading = false;
                    self.draft.retain_known(&directory);
                    self.directory = directory;
                }
                AppMessage::LoadCancelled => self.loading = false,
                AppMessage::Log(entry) => self.logs.push(entry),
            }
        }
    }

    /// Mount the viewport on first use and add overlays once it has loaded.
    fn drive_map(&mut self, ctx: &egui::Context) {
        if self.map_error.is_some() {
            return;
        }

        if self.map.state() == ComposerState::Uninitialized {
            if let Err(e) = self.composer.mount(&mut self.map, Some(ctx)) {
                self.map_failed("Map could not start", e);
                return;
            }
        }

        if self.map.state() == ComposerState::Initializing {
            match self.composer.poll_compose(&mut self.map) {
                Ok(true) => self.logs.push(LogEntry::success(format!(
                    "Map ready with {} overlays",
                    self.map.overlays().len()
                ))),
                Ok(false) => ctx.request_repaint(),
                Err(e) => self.map_failed("Map overlays were not added", e),
            }
        }
    }

    fn map_failed(&mut self, context: &str, e: loaddesk_core::Error) {
        warn!(error = %e, "{}", context);
        self.logs.push(LogEntry::error(format!("{}: {}", context, e)));
        self.map_error = Some(e.to_string());
    }

    fn handle_form_action(&mut self, action: FormAction) {
        match action {
            FormAction::OpenRecords => {
                self.loading = true;
                io::open_records(self.tx.clone());
            }
            FormAction::SaveDraft => {
                let summary = self.draft.summary(&self.directory);
                match serde_json::to_string(&self.draft) {
                    Ok(json) => info!(draft = %json, "draft saved"),
                    Err(e) => warn!(error = %e, "draft could not be serialized"),
                }
                self.logs.push(LogEntry::success(summary));
            }
            FormAction::ClearDraft => self.draft = LoadDraft::default(),
        }
    }
}

impl eframe::App for LoadDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_messages();
        self.drive_map(ctx);

        if self.loading {
            ctx.request_repaint();
        }

        let mut form_action = None;
        egui::SidePanel::left("draft_form")
            .resizable(true)
            .default_width(320.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                form_action = show_draft_form(ui, &mut self.draft, &self.directory, self.loading);
            });
        if let Some(action) = form_action {
            self.handle_form_action(action);
        }

        egui::TopBottomPanel::bottom("console")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                if show_console(ui, &self.logs, &mut self.problems_only) {
                    self.logs.clear();
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            show_map_view(ui, &mut self.map);
        });
    }
}
