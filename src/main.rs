mod app;
mod cache;
mod config;
mod data;
mod service;
mod state;
mod storage;
mod ui;

use app::FareboardApp;
use config::StorageConfig;
use eframe::egui;
use service::{DataError, FlightService};
use state::DashboardState;

fn main() -> eframe::Result {
    env_logger::init();

    let state = match StorageConfig::from_env() {
        Ok(config) => {
            match &config {
                StorageConfig::Blob { .. } => log::info!("storage: remote blob container"),
                StorageConfig::Dir { root } => {
                    log::info!("storage: local mirror at {}", root.display());
                }
            }
            DashboardState::new(FlightService::new(config.open()))
        }
        Err(e) => {
            let error = DataError::Config(e.to_string());
            log::error!("{error}");
            DashboardState::config_failed(error.to_string())
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flight Deal Finder",
        options,
        Box::new(|_cc| Ok(Box::new(FareboardApp::new(state)))),
    )
}
