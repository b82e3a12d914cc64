// # DNS Handler Trait
//
// Defines the interface a zone synchronization backend exposes to its caller.
//
// ## Implementations
//
// - OVHcloud: `zonesync-provider-ovh` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::{ChangeRequest, DnsHandler};
//
// async fn sync(handler: &dyn DnsHandler) -> zonesync_core::Result<()> {
//     for zone in handler.get_zones().await? {
//         let state = handler.get_zone_state(&zone).await?;
//         let requests: Vec<ChangeRequest> = plan(&zone, &state);
//         handler.execute_requests(&zone, &state, &requests).await?;
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::change::{ChangeRequest, ExecutionReport};
use crate::config::HandlerConfig;
use crate::zone::{HostedZone, ZoneState};

use super::metrics::Metrics;
use super::rate_limiter::RateLimiter;
use super::zone_cache::ZoneCache;

/// Trait for zone synchronization backends
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks. A
/// single handler may be driven for several zones at once; the shared
/// [`RateLimiter`] is the only admission control across those calls.
///
/// # Failure Policy
///
/// - [`get_zones`](Self::get_zones) and [`get_zone_state`](Self::get_zone_state)
///   fail atomically: they never return a partial result.
/// - [`execute_requests`](Self::execute_requests) is best effort: every request
///   is attempted, applied changes are not rolled back and the first error is
///   returned. The handler's [`ZoneCache`] is told about the outcome exactly
///   once per call.
///
/// # Retries
///
/// Handlers never retry. Retry policy belongs to the caller.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    /// List all zones visible to the credentials
    ///
    /// Zones are returned in the order the remote listing returns them, each
    /// with its forwarded (delegated) sub-names.
    async fn get_zones(&self) -> Result<Vec<HostedZone>, crate::Error>;

    /// Reconstruct the synchronized record sets of a zone
    async fn get_zone_state(&self, zone: &HostedZone) -> Result<ZoneState, crate::Error>;

    /// Apply change requests to a zone, in order
    ///
    /// # Parameters
    ///
    /// - `zone`: Target zone
    /// - `state`: Current state snapshot of the zone
    /// - `requests`: Requests addressed to `zone`
    ///
    /// # Returns
    ///
    /// - `Ok(ExecutionReport)`: Every request reached a non-failed state
    /// - `Err(Error::PartialBatchFailure)`: At least one request failed
    async fn execute_requests(
        &self,
        zone: &HostedZone,
        state: &ZoneState,
        requests: &[ChangeRequest],
    ) -> Result<ExecutionReport, crate::Error>;

    /// Report that a zone state read earlier no longer matches the remote zone
    ///
    /// Forwarded to the handler's [`ZoneCache`].
    ///
    /// # Returns
    ///
    /// `true` if cached state was dropped
    async fn report_zone_state_conflict(&self, zone: &HostedZone, err: &crate::Error) -> bool;

    /// Get the provider type code (for logging/debugging)
    fn provider_type(&self) -> &'static str;
}

/// Collaborators a handler is constructed with
///
/// The handler owns these handles for its lifetime. The rate limiter may be
/// shared between handlers to bound their combined call rate.
#[derive(Clone)]
pub struct HandlerContext {
    /// Admission control for every remote call
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Per-zone call counters
    pub metrics: Arc<dyn Metrics>,
    /// Caller-owned cache notified after each batch
    pub cache: Arc<dyn ZoneCache>,
}

impl HandlerContext {
    /// Create a context from explicit collaborators
    pub fn new(
        rate_limiter: Arc<dyn RateLimiter>,
        metrics: Arc<dyn Metrics>,
        cache: Arc<dyn ZoneCache>,
    ) -> Self {
        Self {
            rate_limiter,
            metrics,
            cache,
        }
    }

    /// Context with a rate limiter built from the handler configuration,
    /// no metrics and a fresh in-memory cache
    pub fn from_config(config: &HandlerConfig) -> Self {
        Self {
            rate_limiter: crate::ratelimit::from_config(&config.rate_limit),
            metrics: Arc::new(crate::metrics::NoopMetrics),
            cache: Arc::new(crate::cache::MemoryZoneCache::new()),
        }
    }
}

/// Helper trait for constructing handlers from configuration
pub trait DnsHandlerFactory: Send + Sync {
    /// Create a DnsHandler instance
    ///
    /// # Parameters
    ///
    /// - `config`: Handler configuration
    /// - `context`: Collaborators handed to the handler
    ///
    /// # Returns
    ///
    /// A boxed DnsHandler trait object
    fn create(
        &self,
        config: &HandlerConfig,
        context: HandlerContext,
    ) -> Result<Box<dyn DnsHandler>, crate::Error>;
}
