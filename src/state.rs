use chrono::{DateTime, Utc};

use crate::data::filter::{self, TableSummary};
use crate::data::history::HistoryCatalog;
use crate::data::loader;
use crate::data::model::{FilterCriteria, FlightTable, Metadata};
use crate::service::FlightService;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Each storage-backed section (flights, metadata, history, snapshot)
/// keeps its own error slot so one failure degrades to a message without
/// taking the others down.
pub struct DashboardState {
    /// `None` only when the session failed configuration; `fatal` then
    /// carries the message and nothing else is rendered.
    service: Option<FlightService>,
    pub fatal: Option<String>,

    pub table: Option<FlightTable>,
    pub table_error: Option<String>,
    pub metadata: Option<Metadata>,
    pub metadata_error: Option<String>,

    /// Active filter selections.
    pub criteria: FilterCriteria,
    /// Rows passing the current criteria (cached between interactions).
    pub filtered: FlightTable,
    /// Upper bound of the price sliders: ceil of the max price.
    pub price_bound: f64,
    pub destination_options: Vec<String>,
    pub airline_options: Vec<String>,

    pub history: HistoryCatalog,
    pub history_error: Option<String>,
    /// Picker label of the snapshot under comparison; `None` is "Current".
    pub selected_snapshot: Option<String>,
    pub snapshot_table: Option<FlightTable>,
    pub snapshot_error: Option<String>,

    /// Transient feedback (export result and the like).
    pub status_message: Option<String>,
}

impl DashboardState {
    pub fn new(service: FlightService) -> Self {
        let mut state = Self::empty(Some(service), None);
        state.reload();
        state
    }

    /// Session that failed configuration: renders the message and halts.
    pub fn config_failed(message: String) -> Self {
        Self::empty(None, Some(message))
    }

    fn empty(service: Option<FlightService>, fatal: Option<String>) -> Self {
        DashboardState {
            service,
            fatal,
            table: None,
            table_error: None,
            metadata: None,
            metadata_error: None,
            criteria: FilterCriteria::default(),
            filtered: FlightTable::default(),
            price_bound: 0.0,
            destination_options: Vec::new(),
            airline_options: Vec::new(),
            history: HistoryCatalog::default(),
            history_error: None,
            selected_snapshot: None,
            snapshot_table: None,
            snapshot_error: None,
            status_message: None,
        }
    }

    /// One full re-evaluation: flights, metadata, and history, each caught
    /// independently, then the filter pass.
    pub fn reload(&mut self) {
        let Some(service) = self.service.as_mut() else {
            return;
        };

        match service.flights() {
            Ok(table) => {
                self.price_bound = filter::price_ceiling(&table);
                self.destination_options = filter::destinations(&table);
                self.airline_options = filter::airlines(&table);
                if self.criteria.max_price.is_infinite() {
                    self.criteria.max_price = self.price_bound;
                } else {
                    self.criteria.max_price = self.criteria.max_price.min(self.price_bound);
                    self.criteria.min_price = self.criteria.min_price.clamp(0.0, self.price_bound);
                }
                self.table = Some(table);
                self.table_error = None;
            }
            Err(e) => {
                log::error!("flight table load failed: {e}");
                self.table = None;
                self.table_error = Some(e.to_string());
            }
        }

        match service.metadata() {
            Ok(meta) => {
                self.metadata = Some(meta);
                self.metadata_error = None;
            }
            Err(e) => {
                log::warn!("metadata load failed: {e}");
                self.metadata = None;
                self.metadata_error = Some(e.to_string());
            }
        }

        match service.history() {
            Ok(catalog) => {
                self.history = catalog;
                self.history_error = None;
            }
            Err(e) => {
                log::warn!("history listing failed: {e}");
                self.history = HistoryCatalog::default();
                self.history_error = Some(e.to_string());
            }
        }

        self.refilter();
        self.reload_snapshot();
    }

    /// Discard all memoized data and re-evaluate eagerly.
    pub fn refresh(&mut self) {
        if let Some(service) = self.service.as_mut() {
            service.refresh();
        }
        self.status_message = None;
        self.reload();
    }

    /// Recompute the filtered subset after a criteria change.
    pub fn refilter(&mut self) {
        self.filtered = match &self.table {
            Some(table) => filter::apply(table, &self.criteria),
            None => FlightTable::default(),
        };
    }

    /// Switch the comparison section to a snapshot (or back to "Current").
    pub fn select_snapshot(&mut self, label: Option<String>) {
        self.selected_snapshot = label;
        self.reload_snapshot();
    }

    fn reload_snapshot(&mut self) {
        self.snapshot_table = None;
        self.snapshot_error = None;
        let (Some(service), Some(label)) = (self.service.as_mut(), &self.selected_snapshot) else {
            return;
        };
        let Some(key) = self.history.resolve(label).map(str::to_string) else {
            // Stale selection from a previous listing.
            self.selected_snapshot = None;
            return;
        };
        match service.snapshot(&key) {
            Ok(table) => self.snapshot_table = Some(table),
            Err(e) => {
                log::warn!("snapshot {key} load failed: {e}");
                self.snapshot_error = Some(e.to_string());
            }
        }
    }

    /// Write the currently filtered table as CSV, row-for-row.
    pub fn export_filtered(&mut self, path: &std::path::Path) {
        let result = loader::write_flight_csv(&self.filtered)
            .and_then(|bytes| std::fs::write(path, bytes).map_err(Into::into));
        self.status_message = Some(match result {
            Ok(()) => format!("Saved {} flights to {}", self.filtered.len(), path.display()),
            Err(e) => format!("Export failed: {e:#}"),
        });
    }

    /// Summary metrics over the full (unfiltered) table.
    pub fn summary(&self) -> Option<TableSummary> {
        self.table.as_ref().and_then(filter::summarize)
    }

    /// Destinations-searched metric: from metadata when available, else
    /// the table-derived distinct count.
    pub fn destinations_metric(&self) -> Option<usize> {
        if let Some(meta) = &self.metadata {
            return Some(meta.destinations_searched as usize);
        }
        self.summary().map(|s| s.distinct_destinations)
    }
}

/// "2h 35m ago" banner text for the last-updated timestamp.
pub fn relative_age(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - last_updated).num_minutes().max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m ago")
    } else {
        format!("{minutes}m ago")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
