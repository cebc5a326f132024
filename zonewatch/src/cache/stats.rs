//! Geometry cache counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated lock-free by the cache.
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    loads: AtomicU64,
    failures: AtomicU64,
}

impl CacheCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_load(&self, available: bool) {
        self.loads.fetch_add(1, Ordering::Relaxed);
        if !available {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of cache activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from an already-populated slot.
    pub hits: u64,
    /// Loader invocations (first loads and refreshes).
    pub loads: u64,
    /// Loads that produced the empty sentinel.
    pub failures: u64,
}

impl CacheStats {
    /// Fraction of lookups served without loading.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.loads;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_snapshot() {
        let counters = CacheCounters::default();
        counters.record_load(true);
        counters.record_load(false);
        counters.record_hit();
        counters.record_hit();

        let stats = counters.snapshot();
        assert_eq!(stats.loads, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.hits, 2);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_hit_rate() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
