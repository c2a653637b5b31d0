use thiserror::Error;

use crate::cache::{KeyedMemo, Memo};
use crate::config::{HISTORY_TTL, LATEST_FLIGHTS_KEY, LATEST_TTL, METADATA_KEY};
use crate::data::history::{HistoryCatalog, HISTORY_PREFIX};
use crate::data::loader;
use crate::data::model::{FlightTable, Metadata, SnapshotRef};
use crate::storage::{FetchError, ObjectStore};

// ---------------------------------------------------------------------------
// Failure taxonomy
// ---------------------------------------------------------------------------

/// The closed set of failures an operation can surface. The presentation
/// layer picks a message per variant; nothing here escalates to a panic
/// and nothing is retried.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("connection error: {0}")]
    Connectivity(String),
    #[error("malformed data: {0}")]
    Parse(String),
}

impl From<FetchError> for DataError {
    fn from(e: FetchError) -> Self {
        DataError::Connectivity(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// FlightService – fetch → parse, memoized
// ---------------------------------------------------------------------------

/// Reads the container through the memo store. Each accessor re-fetches
/// only when its slot is stale; `refresh` discards every slot at once.
/// Failures are per-operation: a metadata failure never blocks the
/// flight table, and vice versa.
pub struct FlightService {
    store: Box<dyn ObjectStore>,
    flights: Memo<FlightTable>,
    metadata: Memo<Metadata>,
    history: Memo<Vec<SnapshotRef>>,
    snapshots: KeyedMemo<FlightTable>,
}

impl FlightService {
    pub fn new(store: Box<dyn ObjectStore>) -> Self {
        FlightService {
            store,
            flights: Memo::new(LATEST_TTL),
            metadata: Memo::new(LATEST_TTL),
            history: Memo::new(HISTORY_TTL),
            snapshots: KeyedMemo::new(HISTORY_TTL),
        }
    }

    /// The current flight table.
    pub fn flights(&mut self) -> Result<FlightTable, DataError> {
        if let Some(table) = self.flights.get() {
            return Ok(table.clone());
        }
        let bytes = self.store.fetch(LATEST_FLIGHTS_KEY)?;
        let table =
            loader::parse_flight_csv(&bytes).map_err(|e| DataError::Parse(format!("{e:#}")))?;
        log::info!("loaded {} flights", table.len());
        self.flights.put(table.clone());
        Ok(table)
    }

    /// The metadata sidecar.
    pub fn metadata(&mut self) -> Result<Metadata, DataError> {
        if let Some(meta) = self.metadata.get() {
            return Ok(meta.clone());
        }
        let bytes = self.store.fetch(METADATA_KEY)?;
        let meta =
            loader::parse_metadata_json(&bytes).map_err(|e| DataError::Parse(format!("{e:#}")))?;
        self.metadata.put(meta.clone());
        Ok(meta)
    }

    /// The snapshot catalog, built from the (memoized) history listing.
    pub fn history(&mut self) -> Result<HistoryCatalog, DataError> {
        if let Some(refs) = self.history.get() {
            return Ok(HistoryCatalog::from_listing(refs.clone()));
        }
        let refs: Vec<SnapshotRef> = self
            .store
            .list_objects(HISTORY_PREFIX)?
            .into_iter()
            .map(|info| SnapshotRef {
                key: info.key,
                last_modified: info.last_modified,
            })
            .collect();
        log::info!("history listing: {} objects", refs.len());
        self.history.put(refs.clone());
        Ok(HistoryCatalog::from_listing(refs))
    }

    /// One archived table by storage key.
    pub fn snapshot(&mut self, key: &str) -> Result<FlightTable, DataError> {
        if let Some(table) = self.snapshots.get(key) {
            return Ok(table.clone());
        }
        let bytes = self.store.fetch(key)?;
        let table =
            loader::parse_flight_csv(&bytes).map_err(|e| DataError::Parse(format!("{e:#}")))?;
        self.snapshots.put(key, table.clone());
        Ok(table)
    }

    /// Discard every memoized entry. The next accessor call re-fetches.
    pub fn refresh(&mut self) {
        log::info!("refresh requested, clearing memo store");
        self.flights.clear();
        self.metadata.clear();
        self.history.clear();
        self.snapshots.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mem::MemStore;
    use chrono::{NaiveDateTime, Utc};
    use std::rc::Rc;

    const CSV: &str = "\
Destination City,Price,Price (numeric),Airline,Flight Number,Aircraft,Departure Airport,Destination Airport,Departure Time,Arrival Time,Duration,Stops
Paris,£45.00,45.00,Ryanair,FR 1234,Boeing 737,STN,CDG,06:25,08:50,1h 25m,0
";
    const META: &str =
        r#"{"last_updated": "2026-08-24T06:00:00", "destinations_searched": 5}"#;

    fn ts(s: &str) -> chrono::DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    fn service(store: &Rc<MemStore>) -> FlightService {
        FlightService::new(Box::new(Rc::clone(store)))
    }

    #[test]
    fn second_read_hits_the_memo() {
        let mut store = MemStore::new();
        store.put(LATEST_FLIGHTS_KEY, CSV.as_bytes(), ts("2026-08-24 06:00:00"));
        let store = Rc::new(store);
        let mut service = service(&store);

        service.flights().unwrap();
        service.flights().unwrap();
        assert_eq!(*store.fetch_count.borrow(), 1);
    }

    #[test]
    fn refresh_forces_a_refetch() {
        let mut store = MemStore::new();
        store.put(LATEST_FLIGHTS_KEY, CSV.as_bytes(), ts("2026-08-24 06:00:00"));
        let store = Rc::new(store);
        let mut service = service(&store);

        service.flights().unwrap();
        service.refresh();
        service.flights().unwrap();
        assert_eq!(*store.fetch_count.borrow(), 2);
    }

    #[test]
    fn metadata_loads_and_is_memoized() {
        let mut store = MemStore::new();
        store.put(METADATA_KEY, META.as_bytes(), ts("2026-08-24 06:00:00"));
        let store = Rc::new(store);
        let mut service = service(&store);

        assert_eq!(service.metadata().unwrap().destinations_searched, 5);
        service.metadata().unwrap();
        assert_eq!(*store.fetch_count.borrow(), 1);
    }

    #[test]
    fn metadata_failure_leaves_flights_usable() {
        let mut store = MemStore::new();
        store.put(LATEST_FLIGHTS_KEY, CSV.as_bytes(), ts("2026-08-24 06:00:00"));
        store.fail(METADATA_KEY, "connection reset");
        let store = Rc::new(store);
        let mut service = service(&store);

        assert!(matches!(
            service.metadata(),
            Err(DataError::Connectivity(_))
        ));
        assert_eq!(service.flights().unwrap().len(), 1);
    }

    #[test]
    fn missing_object_maps_to_connectivity() {
        let store = Rc::new(MemStore::new());
        let mut service = service(&store);
        assert!(matches!(
            service.flights(),
            Err(DataError::Connectivity(_))
        ));
    }

    #[test]
    fn malformed_csv_maps_to_parse() {
        let mut store = MemStore::new();
        store.put(LATEST_FLIGHTS_KEY, b"Destination City\nParis\n", ts("2026-08-24 06:00:00"));
        let store = Rc::new(store);
        let mut service = service(&store);
        assert!(matches!(service.flights(), Err(DataError::Parse(_))));
    }

    #[test]
    fn history_and_snapshot_load() {
        let mut store = MemStore::new();
        store.put(
            "history/flights_2026-08-24_060000.csv",
            CSV.as_bytes(),
            ts("2026-08-24 06:00:00"),
        );
        store.put(
            "history/flights_2026-08-23_060000.csv",
            CSV.as_bytes(),
            ts("2026-08-23 06:00:00"),
        );
        let store = Rc::new(store);
        let mut service = service(&store);

        let catalog = service.history().unwrap();
        assert_eq!(catalog.len(), 1);
        let key = catalog.resolve(&catalog.labels()[0]).unwrap().to_string();
        assert_eq!(service.snapshot(&key).unwrap().len(), 1);
    }
}
