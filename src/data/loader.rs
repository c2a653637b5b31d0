use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use super::model::{FlightRow, FlightTable, Metadata, UNKNOWN_DEPARTURE_DATE};

// ---------------------------------------------------------------------------
// Flight CSV
// ---------------------------------------------------------------------------

/// Parse a flight CSV (header row + data rows) into a [`FlightTable`].
///
/// Columns are matched by header name, not position. The parse is
/// all-or-nothing: a missing required column or an unparseable numeric
/// price / stop count on any row fails the whole call.
pub fn parse_flight_csv(bytes: &[u8]) -> Result<FlightTable> {
    let mut reader = csv::Reader::from_reader(bytes);

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<FlightRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        if row.price < 0.0 {
            bail!("CSV row {row_no}: negative price {}", row.price);
        }
        rows.push(row);
    }

    Ok(FlightTable::new(rows))
}

/// Serialize a table back to CSV, header row first, rows in table order.
/// Used for the filtered-table download; output re-parses to an identical
/// table.
pub fn write_flight_csv(table: &FlightTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &table.rows {
        writer.serialize(row).context("serializing CSV row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV output: {}", e.error()))
}

// ---------------------------------------------------------------------------
// Metadata JSON
// ---------------------------------------------------------------------------

/// Wire shape of `metadata.json`.
#[derive(Deserialize)]
struct RawMetadata {
    last_updated: String,
    departure_date: Option<String>,
    destinations_searched: u32,
}

/// Parse the metadata sidecar. `last_updated` is required and must be a
/// valid ISO-8601 timestamp; a missing `departure_date` falls back to the
/// "unknown" sentinel instead of failing.
pub fn parse_metadata_json(bytes: &[u8]) -> Result<Metadata> {
    let raw: RawMetadata = serde_json::from_slice(bytes).context("parsing metadata JSON")?;

    let last_updated = parse_iso_timestamp(&raw.last_updated)
        .with_context(|| format!("invalid last_updated {:?}", raw.last_updated))?;

    Ok(Metadata {
        last_updated,
        departure_date: raw
            .departure_date
            .unwrap_or_else(|| UNKNOWN_DEPARTURE_DATE.to_string()),
        destinations_searched: raw.destinations_searched,
    })
}

/// Accept RFC 3339 or a naive `%Y-%m-%dT%H:%M:%S` timestamp (the writer
/// emits `datetime.isoformat()` without an offset); naive times are UTC.
fn parse_iso_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .context("not an ISO-8601 timestamp")?;
    Ok(Utc.from_utc_datetime(&naive))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const SAMPLE_CSV: &str = "\
Destination City,Price,Price (numeric),Airline,Flight Number,Aircraft,Departure Airport,Destination Airport,Departure Time,Arrival Time,Duration,Stops
Paris,£45.00,45.00,Ryanair,FR 1234,Boeing 737,STN,CDG,06:25,08:50,1h 25m,0
Rome,£120.50,120.50,ITA Airways,AZ 205,Airbus A320,LHR,FCO,09:10,12:55,2h 45m,1
";

    #[test]
    fn parses_rows_by_header_name() {
        let table = parse_flight_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].destination, "Paris");
        assert_eq!(table.rows[0].price, 45.0);
        assert_eq!(table.rows[0].stops, 0);
        assert_eq!(table.rows[1].airline, "ITA Airways");
        assert_eq!(table.rows[1].stops, 1);
    }

    #[test]
    fn column_order_is_irrelevant() {
        let shuffled = "\
Stops,Airline,Price (numeric),Destination City,Price,Flight Number,Aircraft,Departure Airport,Destination Airport,Departure Time,Arrival Time,Duration
0,easyJet,59.99,Lisbon,£59.99,U2 7788,Airbus A319,LGW,LIS,07:00,09:45,2h 45m
";
        let table = parse_flight_csv(shuffled.as_bytes()).unwrap();
        assert_eq!(table.rows[0].destination, "Lisbon");
        assert_eq!(table.rows[0].airline, "easyJet");
        assert_eq!(table.rows[0].price, 59.99);
    }

    #[test]
    fn missing_required_column_fails() {
        let bad = "Destination City,Price\nParis,£45.00\n";
        assert!(parse_flight_csv(bad.as_bytes()).is_err());
    }

    #[test]
    fn unparseable_price_fails_whole_table() {
        let bad = SAMPLE_CSV.replace("120.50,ITA", "n/a,ITA");
        assert!(parse_flight_csv(bad.as_bytes()).is_err());
    }

    #[test]
    fn negative_price_fails() {
        let bad = SAMPLE_CSV.replace("45.00,Ryanair", "-45.00,Ryanair");
        assert!(parse_flight_csv(bad.as_bytes()).is_err());
    }

    #[test]
    fn export_round_trips() {
        let table = parse_flight_csv(SAMPLE_CSV.as_bytes()).unwrap();
        let bytes = write_flight_csv(&table).unwrap();
        let reparsed = parse_flight_csv(&bytes).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn metadata_with_all_fields() {
        let json = br#"{
            "last_updated": "2026-08-24T06:00:00",
            "departure_date": "2026-09-12",
            "destinations_searched": 18
        }"#;
        let meta = parse_metadata_json(json).unwrap();
        assert_eq!(meta.last_updated.year(), 2026);
        assert_eq!(meta.departure_date, "2026-09-12");
        assert_eq!(meta.destinations_searched, 18);
    }

    #[test]
    fn metadata_departure_date_defaults_to_unknown() {
        let json = br#"{"last_updated": "2026-08-24T06:00:00+00:00", "destinations_searched": 3}"#;
        let meta = parse_metadata_json(json).unwrap();
        assert_eq!(meta.departure_date, UNKNOWN_DEPARTURE_DATE);
    }

    #[test]
    fn metadata_bad_timestamp_fails() {
        let json = br#"{"last_updated": "yesterday", "destinations_searched": 3}"#;
        assert!(parse_metadata_json(json).is_err());
    }

    #[test]
    fn metadata_missing_last_updated_fails() {
        let json = br#"{"destinations_searched": 3}"#;
        assert!(parse_metadata_json(json).is_err());
    }
}
