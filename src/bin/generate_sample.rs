//! Writes a sample local container for offline runs:
//!
//! ```text
//! sample_data/
//!   latest_flights.csv
//!   metadata.json
//!   history/flights_<ts>.csv   (three older snapshots)
//! ```
//!
//! Point the app at it with `FLIGHT_DATA_DIR=sample_data`.

use chrono::{Duration, Utc};

const HEADER: [&str; 12] = [
    "Destination City",
    "Price",
    "Price (numeric)",
    "Airline",
    "Flight Number",
    "Aircraft",
    "Departure Airport",
    "Destination Airport",
    "Departure Time",
    "Arrival Time",
    "Duration",
    "Stops",
];

const ROUTES: [(&str, &str, &str, &str, f64); 8] = [
    ("Paris", "CDG", "Ryanair", "FR", 38.0),
    ("Rome", "FCO", "ITA Airways", "AZ", 74.0),
    ("Lisbon", "LIS", "easyJet", "U2", 55.0),
    ("Athens", "ATH", "Aegean", "A3", 92.0),
    ("Barcelona", "BCN", "Vueling", "VY", 47.0),
    ("Prague", "PRG", "Ryanair", "FR", 41.0),
    ("Vienna", "VIE", "Austrian", "OS", 83.0),
    ("Copenhagen", "CPH", "SAS", "SK", 66.0),
];

const AIRCRAFT: [&str; 3] = ["Boeing 737", "Airbus A320", "Airbus A319"];

/// Minimal deterministic PRNG (64-bit LCG), enough for sample jitter.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }
}

fn flight_csv(rng: &mut Lcg, price_drift: f64) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER).expect("header");

    for (city, airport, airline, code, base_price) in ROUTES {
        // A couple of fare options per route.
        for _ in 0..3 {
            let price = (base_price + price_drift + rng.next_f64() * 40.0).max(15.0);
            let stops = if rng.next_f64() < 0.7 { 0 } else { 1 + rng.pick(2) };
            let dep_hour = 6 + rng.pick(14);
            let duration_min = 75 + rng.pick(150);
            let arr_total = dep_hour * 60 + 25 + duration_min;
            writer
                .write_record([
                    city,
                    &format!("£{price:.2}"),
                    &format!("{price:.2}"),
                    airline,
                    &format!("{code} {}", 1000 + rng.pick(8000)),
                    AIRCRAFT[rng.pick(AIRCRAFT.len())],
                    "STN",
                    airport,
                    &format!("{dep_hour:02}:25"),
                    &format!("{:02}:{:02}", (arr_total / 60) % 24, arr_total % 60),
                    &format!("{}h {}m", duration_min / 60, duration_min % 60),
                    &stops.to_string(),
                ])
                .expect("row");
        }
    }
    String::from_utf8(writer.into_inner().expect("flush")).expect("utf8")
}

fn main() {
    let root = std::path::Path::new("sample_data");
    std::fs::create_dir_all(root.join("history")).expect("creating sample_data/");

    let mut rng = Lcg(42);
    let now = Utc::now();

    std::fs::write(root.join("latest_flights.csv"), flight_csv(&mut rng, 0.0))
        .expect("writing latest_flights.csv");

    let metadata = serde_json::json!({
        "last_updated": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "departure_date": (now + Duration::days(19)).format("%Y-%m-%d").to_string(),
        "destinations_searched": ROUTES.len(),
    });
    std::fs::write(
        root.join("metadata.json"),
        serde_json::to_string_pretty(&metadata).expect("metadata json"),
    )
    .expect("writing metadata.json");

    // The newest snapshot mirrors the current table; older ones drift.
    // Oldest first, so file mtimes line up with the embedded dates.
    for days_ago in (0..4i64).rev() {
        let stamp = now - Duration::days(days_ago);
        let name = format!("flights_{}.csv", stamp.format("%Y-%m-%d_%H%M%S"));
        let drift = days_ago as f64 * 6.5;
        std::fs::write(root.join("history").join(name), flight_csv(&mut rng, drift))
            .expect("writing history snapshot");
    }

    println!("Wrote sample container to {}", root.display());
    println!("Run with: FLIGHT_DATA_DIR={} cargo run", root.display());
}
