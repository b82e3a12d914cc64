// # Memory Zone Cache
//
// In-memory implementation of ZoneCache.
//
// ## Purpose
//
// Holds the last zone state snapshot read for each zone so a caller can
// diff against it without re-reading the zone (1 + N remote calls) on every
// pass.
//
// ## Outcome Handling
//
// - Successful batch: the requests are applied to the cached snapshot
// - Failed batch: the snapshot is dropped, the next pass re-reads the zone
// - Conflict report: the snapshot is dropped
//
// Nothing is persisted. All state is lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::change::ChangeRequest;
use crate::traits::ZoneCache;
use crate::zone::{HostedZone, ZoneState};
use crate::Error;

/// Cached snapshot of a zone
#[derive(Debug, Clone)]
pub struct CachedZoneState {
    /// The snapshot
    pub state: ZoneState,
    /// When the snapshot was read from the remote zone
    pub cached_at: DateTime<Utc>,
}

impl CachedZoneState {
    fn new(state: ZoneState) -> Self {
        Self {
            state,
            cached_at: Utc::now(),
        }
    }

    /// Check if the snapshot is older than the given duration
    pub fn is_stale(&self, max_age: chrono::Duration) -> bool {
        Utc::now().signed_duration_since(self.cached_at) > max_age
    }
}

/// In-memory zone state cache
///
/// # Example
///
/// ```rust,no_run
/// use zonesync_core::cache::MemoryZoneCache;
/// use zonesync_core::{HostedZone, ZoneState};
///
/// #[tokio::main]
/// async fn main() {
///     let cache = MemoryZoneCache::new();
///     let zone = HostedZone::new("ovh", "example.com", "example.com", Vec::new());
///
///     cache.store(&zone, ZoneState::default()).await;
///     assert!(cache.get(&zone).await.is_some());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryZoneCache {
    inner: Arc<RwLock<HashMap<String, CachedZoneState>>>,
}

impl MemoryZoneCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly read snapshot
    pub async fn store(&self, zone: &HostedZone, state: ZoneState) {
        let mut guard = self.inner.write().await;
        guard.insert(zone.id.clone(), CachedZoneState::new(state));
    }

    /// Get the cached snapshot of a zone
    pub async fn get(&self, zone: &HostedZone) -> Option<ZoneState> {
        let guard = self.inner.read().await;
        guard.get(&zone.id).map(|cached| cached.state.clone())
    }

    /// Get the cached snapshot with its timestamp
    pub async fn get_entry(&self, zone: &HostedZone) -> Option<CachedZoneState> {
        let guard = self.inner.read().await;
        guard.get(&zone.id).cloned()
    }

    /// Drop the cached snapshot of a zone; returns `true` if one existed
    pub async fn invalidate(&self, zone: &HostedZone) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(&zone.id).is_some()
    }

    /// Get the number of cached zones
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl ZoneCache for MemoryZoneCache {
    async fn apply_requests(
        &self,
        err: Option<&Error>,
        zone: &HostedZone,
        requests: &[ChangeRequest],
    ) {
        let mut guard = self.inner.write().await;
        match err {
            None => {
                if let Some(cached) = guard.get_mut(&zone.id) {
                    for request in requests {
                        request.apply_to(cached.state.dnssets_mut());
                    }
                    debug!("Applied {} change requests to cached state of zone {}", requests.len(), zone.id);
                }
            }
            Some(e) => {
                if guard.remove(&zone.id).is_some() {
                    warn!("Dropped cached state of zone {} after failed batch: {}", zone.id, e);
                }
            }
        }
    }

    async fn report_zone_state_conflict(&self, zone: &HostedZone, err: &Error) -> bool {
        let removed = self.invalidate(zone).await;
        if removed {
            warn!("Zone state conflict for {}, cached state dropped: {}", zone.id, err);
        }
        removed
    }
}
