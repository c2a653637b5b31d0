use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FlightRow – one priced itinerary (one row of the source CSV)
// ---------------------------------------------------------------------------

/// A single priced itinerary. Field names are serde-mapped to the fixed
/// CSV header names, so the same struct drives parsing and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRow {
    #[serde(rename = "Destination City")]
    pub destination: String,
    /// Currency-formatted display price, e.g. "£45.00".
    #[serde(rename = "Price")]
    pub price_display: String,
    /// Machine-readable price. Invariant: non-negative.
    #[serde(rename = "Price (numeric)")]
    pub price: f64,
    #[serde(rename = "Airline")]
    pub airline: String,
    #[serde(rename = "Flight Number")]
    pub flight_number: String,
    #[serde(rename = "Aircraft")]
    pub aircraft: String,
    #[serde(rename = "Departure Airport")]
    pub departure_airport: String,
    #[serde(rename = "Destination Airport")]
    pub destination_airport: String,
    #[serde(rename = "Departure Time")]
    pub departure_time: String,
    #[serde(rename = "Arrival Time")]
    pub arrival_time: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Stops")]
    pub stops: u32,
}

// ---------------------------------------------------------------------------
// FlightTable – the complete parsed dataset
// ---------------------------------------------------------------------------

/// Ordered sequence of rows, in source order. Duplicates are permitted.
/// Replaced wholesale on refresh or snapshot selection, never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightTable {
    pub rows: Vec<FlightRow>,
}

impl FlightTable {
    pub fn new(rows: Vec<FlightRow>) -> Self {
        FlightTable { rows }
    }

    /// Number of flights.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Metadata – sidecar record describing the current dataset
// ---------------------------------------------------------------------------

/// Sentinel shown when the metadata record carries no departure date.
pub const UNKNOWN_DEPARTURE_DATE: &str = "unknown";

/// Parsed `metadata.json`. Optional at the display level: the flight table
/// must still render when this record is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub last_updated: DateTime<Utc>,
    pub departure_date: String,
    pub destinations_searched: u32,
}

// ---------------------------------------------------------------------------
// SnapshotRef – one archived copy of the flight table
// ---------------------------------------------------------------------------

/// Identifies one archived table in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// FilterCriteria – the user's active filter conjunction
// ---------------------------------------------------------------------------

/// The active filter selections. An empty destination or airline set means
/// "no restriction". Rebuilt from the widgets on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub min_price: f64,
    pub max_price: f64,
    pub destinations: BTreeSet<String>,
    pub airlines: BTreeSet<String>,
    pub direct_only: bool,
}

impl Default for FilterCriteria {
    /// Unrestricted: the full price range, no set restrictions, stops allowed.
    fn default() -> Self {
        FilterCriteria {
            min_price: 0.0,
            max_price: f64::INFINITY,
            destinations: BTreeSet::new(),
            airlines: BTreeSet::new(),
            direct_only: false,
        }
    }
}

impl FilterCriteria {
    /// Whether a row passes every active predicate (criteria conjunction).
    pub fn matches(&self, row: &FlightRow) -> bool {
        if row.price < self.min_price || row.price > self.max_price {
            return false;
        }
        if !self.destinations.is_empty() && !self.destinations.contains(&row.destination) {
            return false;
        }
        if !self.airlines.is_empty() && !self.airlines.contains(&row.airline) {
            return false;
        }
        if self.direct_only && row.stops != 0 {
            return false;
        }
        true
    }
}
