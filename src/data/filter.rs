use super::model::{FilterCriteria, FlightTable};

// ---------------------------------------------------------------------------
// Filter application
// ---------------------------------------------------------------------------

/// Return the rows passing the criteria conjunction, in input order.
///
/// Pure and total: an empty result is zero matching rows, not a failure.
pub fn apply(table: &FlightTable, criteria: &FilterCriteria) -> FlightTable {
    FlightTable::new(
        table
            .rows
            .iter()
            .filter(|row| criteria.matches(row))
            .cloned()
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Derived read-only views
// ---------------------------------------------------------------------------

/// Headline numbers for the summary strip. `None` for an empty table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub total_flights: usize,
    pub cheapest: f64,
    pub mean_price: f64,
    pub distinct_destinations: usize,
}

pub fn summarize(table: &FlightTable) -> Option<TableSummary> {
    if table.is_empty() {
        return None;
    }
    let cheapest = table
        .rows
        .iter()
        .map(|r| r.price)
        .fold(f64::INFINITY, f64::min);
    let mean_price = table.rows.iter().map(|r| r.price).sum::<f64>() / table.len() as f64;
    Some(TableSummary {
        total_flights: table.len(),
        cheapest,
        mean_price,
        distinct_destinations: destinations(table).len(),
    })
}

/// Sorted distinct destination cities.
pub fn destinations(table: &FlightTable) -> Vec<String> {
    let mut out: Vec<String> = table.rows.iter().map(|r| r.destination.clone()).collect();
    out.sort();
    out.dedup();
    out
}

/// Sorted distinct airlines.
pub fn airlines(table: &FlightTable) -> Vec<String> {
    let mut out: Vec<String> = table.rows.iter().map(|r| r.airline.clone()).collect();
    out.sort();
    out.dedup();
    out
}

/// Maximum price rounded up to the next whole currency unit; the upper
/// bound of the price slider. Zero for an empty table.
pub fn price_ceiling(table: &FlightTable) -> f64 {
    table
        .rows
        .iter()
        .map(|r| r.price)
        .fold(0.0, f64::max)
        .ceil()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FilterCriteria, FlightRow};
    use std::collections::BTreeSet;

    fn row(destination: &str, price: f64, airline: &str, stops: u32) -> FlightRow {
        FlightRow {
            destination: destination.to_string(),
            price_display: format!("£{price:.2}"),
            price,
            airline: airline.to_string(),
            flight_number: "XX 000".to_string(),
            aircraft: "Airbus A320".to_string(),
            departure_airport: "LHR".to_string(),
            destination_airport: "XXX".to_string(),
            departure_time: "08:00".to_string(),
            arrival_time: "10:00".to_string(),
            duration: "2h 0m".to_string(),
            stops,
        }
    }

    fn sample() -> FlightTable {
        FlightTable::new(vec![
            row("Paris", 45.00, "Ryanair", 0),
            row("Rome", 120.50, "ITA Airways", 1),
            row("Paris", 78.25, "easyJet", 0),
        ])
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unrestricted_criteria_is_identity() {
        let table = sample();
        assert_eq!(apply(&table, &FilterCriteria::default()), table);
    }

    #[test]
    fn result_is_ordered_subset() {
        let table = sample();
        let criteria = FilterCriteria {
            max_price: 100.0,
            ..Default::default()
        };
        let out = apply(&table, &criteria);
        assert_eq!(out.rows, vec![table.rows[0].clone(), table.rows[2].clone()]);
    }

    #[test]
    fn price_band_selects_single_row() {
        // Prices 45.00 / 120.50 / 78.25, band [50, 100] keeps only 78.25.
        let table = FlightTable::new(vec![
            row("Paris", 45.00, "Ryanair", 0),
            row("Rome", 120.50, "ITA Airways", 1),
            row("Paris", 78.25, "easyJet", 0),
        ]);
        let criteria = FilterCriteria {
            min_price: 50.0,
            max_price: 100.0,
            ..Default::default()
        };
        let out = apply(&table, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows[0].price, 78.25);
    }

    #[test]
    fn direct_only_keeps_zero_stop_rows_in_order() {
        let table = FlightTable::new(vec![
            row("Paris", 45.0, "Ryanair", 0),
            row("Rome", 60.0, "ITA Airways", 1),
            row("Lisbon", 70.0, "easyJet", 0),
            row("Athens", 90.0, "Aegean", 2),
        ]);
        let criteria = FilterCriteria {
            direct_only: true,
            ..Default::default()
        };
        let out = apply(&table, &criteria);
        let stops: Vec<u32> = out.rows.iter().map(|r| r.stops).collect();
        assert_eq!(stops, vec![0, 0]);
        assert_eq!(out.rows[0].destination, "Paris");
        assert_eq!(out.rows[1].destination, "Lisbon");
    }

    #[test]
    fn destination_and_airline_sets_restrict() {
        let table = sample();
        let criteria = FilterCriteria {
            destinations: set(&["Paris"]),
            airlines: set(&["easyJet"]),
            ..Default::default()
        };
        let out = apply(&table, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows[0].airline, "easyJet");
    }

    #[test]
    fn every_output_row_satisfies_criteria() {
        let table = sample();
        let criteria = FilterCriteria {
            min_price: 40.0,
            max_price: 90.0,
            destinations: set(&["Paris", "Rome"]),
            airlines: BTreeSet::new(),
            direct_only: true,
        };
        for r in &apply(&table, &criteria).rows {
            assert!(criteria.matches(r));
        }
    }

    #[test]
    fn apply_is_idempotent() {
        let table = sample();
        let criteria = FilterCriteria {
            max_price: 100.0,
            direct_only: true,
            ..Default::default()
        };
        let once = apply(&table, &criteria);
        assert_eq!(apply(&once, &criteria), once);
    }

    #[test]
    fn empty_result_is_valid() {
        let criteria = FilterCriteria {
            min_price: 1000.0,
            ..Default::default()
        };
        assert!(apply(&sample(), &criteria).is_empty());
    }

    #[test]
    fn summary_views() {
        let table = sample();
        let summary = summarize(&table).unwrap();
        assert_eq!(summary.total_flights, 3);
        assert_eq!(summary.cheapest, 45.00);
        assert!((summary.mean_price - 81.25).abs() < 1e-9);
        assert_eq!(summary.distinct_destinations, 2);

        assert_eq!(destinations(&table), vec!["Paris", "Rome"]);
        assert_eq!(airlines(&table), vec!["ITA Airways", "Ryanair", "easyJet"]);
        assert_eq!(price_ceiling(&table), 121.0);
    }

    #[test]
    fn empty_table_summaries() {
        let empty = FlightTable::default();
        assert!(summarize(&empty).is_none());
        assert_eq!(price_ceiling(&empty), 0.0);
        assert!(destinations(&empty).is_empty());
    }
}
