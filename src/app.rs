use eframe::egui;

use crate::state::DashboardState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FareboardApp {
    pub state: DashboardState,
}

impl FareboardApp {
    pub fn new(state: DashboardState) -> Self {
        Self { state }
    }
}

impl eframe::App for FareboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // A configuration failure is fatal for the session: render the
        // message and nothing else.
        if let Some(fatal) = &self.state.fatal {
            let fatal = fatal.clone();
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("⚠ App configuration error");
                ui.label(fatal);
            });
            return;
        }

        // ---- Top panel: toolbar and banner ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and history picker ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary and deals table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::central_panel(ui, &mut self.state);
        });
    }
}
