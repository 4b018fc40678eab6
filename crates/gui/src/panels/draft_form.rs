//! "Add new load draft" panel: carrier/driver pickers and the free-form fields.

use egui::{ComboBox, Grid, ScrollArea, Ui};

use loaddesk_core::{Directory, Keyed};

use crate::state::draft::{LoadDraft, US_STATES};

/// Action requested from the form panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Pick a CSV file and reload the directory from it.
    OpenRecords,
    SaveDraft,
    ClearDraft,
}

/// Show the form. `loading` disables the record buttons while a load runs.
pub fn show_draft_form(
    ui: &mut Ui,
    draft: &mut LoadDraft,
    directory: &Directory,
    loading: bool,
) -> Option<FormAction> {
    let mut action = None;

    ui.heading("Add new load draft");
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!loading, egui::Button::new("Load records…"))
            .on_hover_text("Open a CSV with DRIVER/CARRIER columns")
            .clicked()
        {
            action = Some(FormAction::OpenRecords);
        }
        if loading {
            ui.spinner();
        } else {
            ui.weak(format!(
                "{} carriers, {} drivers",
                directory.carriers.len(),
                directory.drivers.len()
            ));
        }
    });
    ui.separator();

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        Grid::new("draft_form")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                text_row(ui, "Load ID", &mut draft.load_id);

                ui.label("Carrier");
                entity_combo(ui, "carrier", &mut draft.carrier, &directory.carriers, "Select carrier");
                ui.end_row();

                ui.label("Driver name");
                entity_combo(ui, "driver", &mut draft.driver, &directory.drivers, "Select driver");
                ui.end_row();

                text_row(ui, "Driver Rate [$]", &mut draft.driver_rate);
                text_row(ui, "Broker Rate [$]", &mut draft.broker_rate);
                text_row(ui, "ZIP from", &mut draft.zip_from);
                state_row(ui, "State from", "state_from", &mut draft.state_from);
                text_row(ui, "ZIP to", &mut draft.zip_to);
                state_row(ui, "State to", "state_to", &mut draft.state_to);
                text_row(ui, "Loaded miles", &mut draft.loaded_miles);
                text_row(ui, "Empty miles", &mut draft.empty_miles);
                text_row(ui, "Total miles", &mut draft.total_miles);
                text_row(ui, "Price per mile [$]", &mut draft.price_per_mile);
                text_row(ui, "Pick date", &mut draft.pick_date);
                text_row(ui, "Delivery date", &mut draft.delivery_date);
            });

        ui.label("Notes");
        ui.text_edit_multiline(&mut draft.notes);
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button("Save draft").clicked() {
                action = Some(FormAction::SaveDraft);
            }
            if ui.button("Clear").clicked() {
                action = Some(FormAction::ClearDraft);
            }
        });
    });

    action
}

fn text_row(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.text_edit_singleline(value);
    ui.end_row();
}

fn state_row(ui: &mut Ui, label: &str, id: &str, value: &mut String) {
    ui.label(label);
    ComboBox::from_id_salt(id)
        .selected_text(if value.is_empty() { "Select state" } else { value.as_str() })
        .show_ui(ui, |ui| {
            ui.selectable_value(value, String::new(), "Select state");
            for code in US_STATES {
                ui.selectable_value(value, code.to_string(), code);
            }
        });
    ui.end_row();
}

/// Combo box over a deduplicated entity list, keyed by id.
fn entity_combo<T: Keyed>(ui: &mut Ui, id: &str, selected: &mut String, items: &[T], placeholder: &str) {
    let current = items
        .iter()
        .find(|item| item.key() == selected.as_str())
        .map(|item| item.label())
        .unwrap_or_else(|| placeholder.to_string());

    ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(180.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(selected, String::new(), placeholder);
            for item in items {
                ui.selectable_value(selected, item.key().to_string(), item.label());
            }
        });
}
