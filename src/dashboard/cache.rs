use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::stats::StatsSnapshot;

/// Default lifetime of a cached stats snapshot.
pub const DEFAULT_STATS_TTL: Duration = Duration::from_secs(300);

struct CachedStats {
    data: Arc<StatsSnapshot>,
    stored_at: Instant,
}

/// Single-slot, time-bounded cache for the stats snapshot.
///
/// Readers clone the `Arc` under the lock; a refresh replaces the whole
/// entry, so a reader never sees a half-written snapshot.
pub struct StatsCache {
    ttl: Duration,
    slot: Mutex<Option<CachedStats>>,
}

impl StatsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh entry, if any.
    pub fn get(&self) -> Option<Arc<StatsSnapshot>> {
        self.get_at(Instant::now())
    }

    fn get_at(&self, now: Instant) -> Option<Arc<StatsSnapshot>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| Arc::clone(&entry.data))
    }

    pub fn store(&self, data: Arc<StatsSnapshot>) {
        self.store_at(data, Instant::now());
    }

    fn store_at(&self, data: Arc<StatsSnapshot>, stored_at: Instant) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(CachedStats { data, stored_at });
    }

    pub fn clear(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_TTL)
    }
}
