use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::model::SnapshotRef;

/// Key prefix under which archived tables live.
pub const HISTORY_PREFIX: &str = "history/";
/// Only CSV objects under the prefix count as snapshots.
pub const HISTORY_SUFFIX: &str = ".csv";
/// The picker shows at most this many prior snapshots.
pub const MENU_LIMIT: usize = 10;

/// Timestamp embedded in snapshot keys, e.g. `flights_2026-08-24_061502.csv`.
const KEY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";
/// Human-readable label format, e.g. "Aug 24, 2026 at 06:15 AM".
const LABEL_FORMAT: &str = "%b %d, %Y at %I:%M %p";

// ---------------------------------------------------------------------------
// HistoryCatalog – ordered snapshot listing with label resolution
// ---------------------------------------------------------------------------

/// Snapshot listing ordered newest-first, with the most recent entry
/// excluded (it duplicates the current dataset) and a label→key map for
/// the picker.
#[derive(Debug, Clone, Default)]
pub struct HistoryCatalog {
    /// Menu entries, newest first, capped at [`MENU_LIMIT`]. May contain
    /// duplicate labels when two snapshots share a minute.
    labels: Vec<String>,
    /// Reverse lookup. On a label collision the later entry in menu order
    /// wins; the earlier snapshot becomes unreachable. Documented behavior.
    by_label: BTreeMap<String, String>,
}

impl HistoryCatalog {
    /// Build the catalog from a raw object listing.
    ///
    /// Keeps CSV objects under the history prefix, orders them by
    /// last-modified descending (ties broken by key ascending), drops the
    /// most recent one, and labels the next [`MENU_LIMIT`].
    pub fn from_listing(mut refs: Vec<SnapshotRef>) -> Self {
        refs.retain(|r| r.key.starts_with(HISTORY_PREFIX) && r.key.ends_with(HISTORY_SUFFIX));
        refs.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.key.cmp(&b.key))
        });

        let mut labels = Vec::new();
        let mut by_label = BTreeMap::new();
        for r in refs.iter().skip(1).take(MENU_LIMIT) {
            let label = format_label(r);
            labels.push(label.clone());
            by_label.insert(label, r.key.clone());
        }
        HistoryCatalog { labels, by_label }
    }

    /// Picker entries in menu order (newest first).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Reverse lookup from a picker label to its storage key. `None` for a
    /// label this listing never produced (stale or sentinel selection).
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.by_label.get(label).map(String::as_str)
    }

    /// Whether there is any prior snapshot to offer.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

/// Human-readable label for a snapshot: the timestamp embedded in the key,
/// reformatted. A key that does not match the expected pattern falls back
/// to the stripped key verbatim.
pub fn format_label(r: &SnapshotRef) -> String {
    let stripped = r
        .key
        .strip_prefix(HISTORY_PREFIX)
        .unwrap_or(&r.key)
        .strip_suffix(HISTORY_SUFFIX)
        .unwrap_or(&r.key);

    let timestamp = stripped.strip_prefix("flights_").unwrap_or(stripped);
    match NaiveDateTime::parse_from_str(timestamp, KEY_TIMESTAMP_FORMAT) {
        Ok(dt) => dt.format(LABEL_FORMAT).to_string(),
        Err(_) => stripped.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
