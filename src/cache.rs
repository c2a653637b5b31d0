use std::collections::BTreeMap;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Memo – one (value, fetched_at) slot with a fixed TTL
// ---------------------------------------------------------------------------

/// A single memoized value. Entries go stale purely by wall-clock age;
/// the only other invalidation path is an explicit [`Memo::clear`].
#[derive(Debug)]
pub struct Memo<T> {
    slot: Option<(T, Instant)>,
    ttl: Duration,
}

impl<T> Memo<T> {
    pub fn new(ttl: Duration) -> Self {
        Memo { slot: None, ttl }
    }

    /// The cached value, if it is younger than the TTL.
    pub fn get(&self) -> Option<&T> {
        self.get_at(Instant::now())
    }

    fn get_at(&self, now: Instant) -> Option<&T> {
        match &self.slot {
            Some((value, fetched_at)) if now.duration_since(*fetched_at) < self.ttl => Some(value),
            _ => None,
        }
    }

    pub fn put(&mut self, value: T) {
        self.slot = Some((value, Instant::now()));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

// ---------------------------------------------------------------------------
// KeyedMemo – per-argument slots sharing one TTL
// ---------------------------------------------------------------------------

/// Memoization keyed by operation argument (here: snapshot key).
#[derive(Debug)]
pub struct KeyedMemo<T> {
    slots: BTreeMap<String, (T, Instant)>,
    ttl: Duration,
}

impl<T> KeyedMemo<T> {
    pub fn new(ttl: Duration) -> Self {
        KeyedMemo {
            slots: BTreeMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<&T> {
        match self.slots.get(key) {
            Some((value, fetched_at)) if now.duration_since(*fetched_at) < self.ttl => Some(value),
            _ => None,
        }
    }

    pub fn put(&mut self, key: &str, value: T) {
        self.slots.insert(key.to_string(), (value, Instant::now()));
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
