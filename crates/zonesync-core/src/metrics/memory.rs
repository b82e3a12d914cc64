// # In-Memory Call Counters
//
// Keeps per-zone, per-class call counts in a map. Used by tests to assert
// exact call budgets, and handy for embedding where no exporter exists.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{Metrics, RequestType};

/// Per-zone call counters
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct CallCounters {
    inner: Arc<Mutex<HashMap<(String, RequestType), u64>>>,
}

impl CallCounters {
    /// Create empty counters
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(String, RequestType), u64>> {
        // counters stay usable even if a panicking thread held the lock
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count for one zone and class
    pub fn get(&self, zone: &str, request_type: RequestType) -> u64 {
        self.lock()
            .get(&(zone.to_string(), request_type))
            .copied()
            .unwrap_or(0)
    }

    /// Count for one class across all zones
    pub fn total(&self, request_type: RequestType) -> u64 {
        self.lock()
            .iter()
            .filter(|((_, t), _)| *t == request_type)
            .map(|(_, n)| n)
            .sum()
    }

    /// Count across all zones and classes
    pub fn grand_total(&self) -> u64 {
        self.lock().values().sum()
    }

    /// Reset all counters
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Metrics for CallCounters {
    fn add_zone_requests(&self, zone: &str, request_type: RequestType, count: u64) {
        *self.lock().entry((zone.to_string(), request_type)).or_insert(0) += count;
    }
}
