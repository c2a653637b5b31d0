use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{FlightRow, FlightTable};
use crate::state::DashboardState;
use crate::ui::panels;

/// Columns shown in the deals table (numeric price stays internal).
const DISPLAY_COLUMNS: [&str; 11] = [
    "Destination",
    "Price",
    "Airline",
    "Flight",
    "Aircraft",
    "From",
    "To",
    "Departure",
    "Arrival",
    "Duration",
    "Stops",
];

/// Rows shown when comparing against a snapshot.
const SNAPSHOT_ROW_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the summary strip, the filtered deals table, and (when selected)
/// the snapshot comparison.
pub fn central_panel(ui: &mut Ui, state: &mut DashboardState) {
    if let Some(err) = &state.table_error {
        ui.heading("❌ Unable to load flight data");
        ui.colored_label(Color32::RED, err.clone());
        ui.label("Data may be updating, or the connection dropped. Try Refresh in a moment.");
        return;
    }
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Loading flight data…");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            summary_strip(ui, state);
            ui.separator();

            ui.heading(format!(
                "🏆 Current Best Deals ({} flights)",
                state.filtered.len()
            ));
            if state.filtered.is_empty() {
                // Valid state, not an error.
                ui.label(
                    RichText::new("No flights match your filters. Try adjusting the criteria.")
                        .color(Color32::YELLOW),
                );
            } else {
                let filtered = state.filtered.clone();
                flight_table(ui, "deals", &filtered, None);
                ui.add_space(6.0);
                if ui.button("📥 Download results as CSV").clicked() {
                    panels::export_dialog(state);
                }
            }

            snapshot_section(ui, state);
        });
}

fn summary_strip(ui: &mut Ui, state: &DashboardState) {
    let Some(summary) = state.summary() else {
        return;
    };
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Total Flights", summary.total_flights.to_string());
        metric(ui, "Cheapest", format!("£{:.2}", summary.cheapest));
        metric(ui, "Average", format!("£{:.2}", summary.mean_price));
        match state.destinations_metric() {
            Some(n) => metric(ui, "Destinations", n.to_string()),
            None => metric(ui, "Destinations", "unavailable".to_string()),
        }
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).weak());
            ui.strong(value);
        });
    });
}

fn snapshot_section(ui: &mut Ui, state: &DashboardState) {
    if let Some(err) = &state.snapshot_error {
        ui.separator();
        ui.colored_label(Color32::RED, format!("Error loading historical data: {err}"));
        return;
    }
    let (Some(label), Some(snapshot)) = (&state.selected_snapshot, &state.snapshot_table) else {
        return;
    };
    ui.separator();
    ui.heading(format!("📂 Past Prices: {label}"));
    ui.label(
        RichText::new("⚠ These are older prices - they may have changed since then.")
            .color(Color32::YELLOW),
    );
    ui.label(format!(
        "Showing first {} flights from this date",
        SNAPSHOT_ROW_LIMIT.min(snapshot.len())
    ));
    flight_table(ui, "snapshot", snapshot, Some(SNAPSHOT_ROW_LIMIT));
}

// ---------------------------------------------------------------------------
// Table widget
// ---------------------------------------------------------------------------

fn flight_table(ui: &mut Ui, id: &str, table: &FlightTable, limit: Option<usize>) {
    let row_count = match limit {
        Some(limit) => table.len().min(limit),
        None => table.len(),
    };

    ui.push_id(id, |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui).striped(true);
        for _ in DISPLAY_COLUMNS {
            builder = builder.column(Column::auto().resizable(true));
        }
        builder
            .header(20.0, |mut header| {
                for title in DISPLAY_COLUMNS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, row_count, |mut row| {
                    let flight = &table.rows[row.index()];
                    for cell in display_cells(flight) {
                        row.col(|ui| {
                            ui.label(cell.clone());
                        });
                    }
                });
            });
    });
}

fn display_cells(flight: &FlightRow) -> [String; 11] {
    [
        flight.destination.clone(),
        flight.price_display.clone(),
        flight.airline.clone(),
        flight.flight_number.clone(),
        flight.aircraft.clone(),
        flight.departure_airport.clone(),
        flight.destination_airport.clone(),
        flight.departure_time.clone(),
        flight.arrival_time.clone(),
        flight.duration.clone(),
        flight.stops.to_string(),
    ]
}
