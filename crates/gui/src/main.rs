//! LoadDesk Desktop GUI
//!
//! Load-draft form beside a US map showing the draft route.

mod app;
mod io;
mod panels;
mod render;
mod state;

use app::LoadDeskApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("LoadDesk - Load Drafts")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "LoadDesk",
        native_options,
        Box::new(|cc| Ok(Box::new(LoadDeskApp::new(cc)))),
    )
}
