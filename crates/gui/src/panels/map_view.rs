//! Central map panel.

use egui::{RichText, Ui};

use loaddesk_core::map::{ComposerState, ViewportHandle};

use crate::render::WalkersViewport;

/// Show the map, or a placeholder while no viewport is live.
pub fn show_map_view(ui: &mut Ui, handle: &mut ViewportHandle<WalkersViewport>) {
    let state = handle.state();
    let overlays = handle.overlays().len();

    ui.horizontal(|ui| {
        ui.label(RichText::new(state_label(state)).strong());
        if state == ComposerState::Ready {
            ui.weak(format!("{} overlays", overlays));
        }
        if let Some(viewport) = handle.viewport_mut() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Recenter").clicked() {
                    viewport.recenter();
                }
                ui.weak(format!("zoom {:.1}", viewport.zoom()));
            });
        }
    });

    match handle.viewport_mut() {
        Some(viewport) => viewport.show(ui),
        None => {
            ui.centered_and_justified(|ui| {
                ui.label("Map unavailable");
            });
        }
    }
}

fn state_label(state: ComposerState) -> &'static str {
    match state {
        ComposerState::Uninitialized => "Map not started",
        ComposerState::Initializing => "Loading map…",
        ComposerState::Ready => "Map ready",
        ComposerState::TornDown => "Map closed",
    }
}
