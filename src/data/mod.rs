/// Data layer: core types, parsing, filtering, and history selection.
///
/// Architecture:
/// ```text
///  blob container (latest_flights.csv, metadata.json, history/*.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes → FlightTable / Metadata
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ FlightTable │  Vec<FlightRow>, source order
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  criteria conjunction → matching subset
///   └──────────┘
/// ```
///
/// `history` orders the archived snapshots and resolves picker labels
/// back to storage keys.

pub mod filter;
pub mod history;
pub mod loader;
pub mod model;
