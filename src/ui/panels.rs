use chrono::Utc;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{relative_age, DashboardState};

// ---------------------------------------------------------------------------
// Top bar – refresh, last-updated banner, status
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.heading("Flight Deal Finder");
        ui.separator();

        if ui
            .button("🔄 Refresh")
            .on_hover_text("Discard cached data and reload")
            .clicked()
        {
            state.refresh();
        }

        ui.separator();

        match &state.metadata {
            Some(meta) => {
                let updated = meta.last_updated;
                ui.label(
                    RichText::new(format!(
                        "Updated {} ({})",
                        updated.format("%b %d, %Y at %I:%M %p"),
                        relative_age(updated, Utc::now())
                    ))
                    .color(Color32::LIGHT_GREEN),
                );
                ui.separator();
                ui.label(format!("📅 Searching for: {}", meta.departure_date));
            }
            None => {
                ui.label(RichText::new("Last update time unavailable").weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg.clone());
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and history picker
// ---------------------------------------------------------------------------

/// Render the filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No flight data loaded.");
        history_section(ui, state);
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut changed = false;

            // ---- Price range ----
            ui.strong("Price range (£)");
            let bound = state.price_bound;
            changed |= ui
                .add(egui::Slider::new(&mut state.criteria.min_price, 0.0..=bound).text("min"))
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut state.criteria.max_price, 0.0..=bound).text("max"))
                .changed();
            if state.criteria.min_price > state.criteria.max_price {
                state.criteria.min_price = state.criteria.max_price;
            }
            ui.separator();

            // ---- Destination / airline multi-selects ----
            let destinations = state.destination_options.clone();
            changed |= value_set_section(ui, "Destinations", &destinations, &mut state.criteria.destinations);
            let airlines = state.airline_options.clone();
            changed |= value_set_section(ui, "Airlines", &airlines, &mut state.criteria.airlines);

            // ---- Direct flights ----
            changed |= ui
                .checkbox(&mut state.criteria.direct_only, "Direct flights only")
                .changed();

            if changed {
                state.refilter();
            }

            ui.separator();
            history_section(ui, state);
        });
}

/// One collapsible multi-select. An empty selection means "no restriction",
/// so the header advertises "all" in that case.
fn value_set_section(
    ui: &mut Ui,
    title: &str,
    options: &[String],
    selected: &mut std::collections::BTreeSet<String>,
) -> bool {
    let mut changed = false;
    let header = if selected.is_empty() {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({}/{})", selected.len(), options.len())
    };

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() && !selected.is_empty() {
                selected.clear();
                changed = true;
            }
            for value in options {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                    changed = true;
                }
            }
        });
    changed
}

/// History picker: up to ten prior snapshots by label, plus "Current".
fn history_section(ui: &mut Ui, state: &mut DashboardState) {
    egui::CollapsingHeader::new(RichText::new("📂 Historical data").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if let Some(err) = &state.history_error {
                ui.colored_label(Color32::RED, err.clone());
                return;
            }
            if state.history.is_empty() {
                ui.label("No older price data yet");
                return;
            }
            ui.label(format!("Found {} older price checks", state.history.len()));

            let current_label = state
                .selected_snapshot
                .clone()
                .unwrap_or_else(|| "Current".to_string());
            let mut selection: Option<Option<String>> = None;
            egui::ComboBox::from_id_salt("history_select")
                .selected_text(current_label.clone())
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(state.selected_snapshot.is_none(), "Current")
                        .clicked()
                    {
                        selection = Some(None);
                    }
                    for label in state.history.labels().to_vec() {
                        let is_selected = state.selected_snapshot.as_deref() == Some(label.as_str());
                        if ui.selectable_label(is_selected, label.as_str()).clicked() {
                            selection = Some(Some(label.clone()));
                        }
                    }
                });
            if let Some(choice) = selection {
                state.select_snapshot(choice);
            }
        });
}

// ---------------------------------------------------------------------------
// Export dialog
// ---------------------------------------------------------------------------

/// Ask for a destination and write the filtered table as CSV.
pub fn export_dialog(state: &mut DashboardState) {
    let suggested = format!(
        "flight_deals_{}.csv",
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    let file = rfd::FileDialog::new()
        .set_title("Save filtered flights")
        .set_file_name(suggested)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_filtered(&path);
        log::info!("export: {:?}", state.status_message);
    }
}
