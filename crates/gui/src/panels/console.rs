//! Console panel: log messages with colored levels.

use egui::{Color32, RichText, ScrollArea, Ui};

use crate::state::{LogEntry, LogLevel};

/// Show the console panel. Returns true when the user asked to clear it.
pub fn show_console(ui: &mut Ui, logs: &[LogEntry], problems_only: &mut bool) -> bool {
    let mut clear = false;
    ui.horizontal(|ui| {
        ui.heading("Console");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("Clear").clicked() {
                clear = true;
            }
            ui.checkbox(problems_only, "Problems only");
            ui.label(format!("{} messages", logs.len()));
        });
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            let shown = logs.iter().filter(|entry| {
                !*problems_only || matches!(entry.level, LogLevel::Warning | LogLevel::Error)
            });
            for entry in shown {
                let (prefix, color) = level_style(entry.level);
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(clock(entry.timestamp))
                            .color(Color32::GRAY)
                            .monospace()
                            .size(11.0),
                    );
                    ui.label(RichText::new(prefix).color(color).monospace().size(11.0));
                    ui.label(RichText::new(&entry.message).monospace().size(11.0));
                });
            }
        });

    clear
}

fn level_style(level: LogLevel) -> (&'static str, Color32) {
    match level {
        LogLevel::Info => ("[INFO]", Color32::from_rgb(150, 180, 220)),
        LogLevel::Warning => ("[WARN]", Color32::from_rgb(230, 180, 50)),
        LogLevel::Error => ("[ERROR]", Color32::from_rgb(220, 60, 60)),
        LogLevel::Success => ("[OK]", Color32::from_rgb(60, 200, 80)),
    }
}

/// `HH:MM:SS` (UTC) of a timestamp.
fn clock(timestamp: std::time::SystemTime) -> String {
    let secs = timestamp
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        % 86400;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
