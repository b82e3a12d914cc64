// # Zone Cache Trait
//
// The zone cache belongs to the caller. It memoizes zone listings and zone
// states read through a handler and decides what to do after a batch of
// changes: keep the snapshot up to date, invalidate it, or let the error
// travel upwards.
//
// Handlers only ever call into the cache to report outcomes. They never read
// from it.

use async_trait::async_trait;

use crate::change::ChangeRequest;
use crate::zone::HostedZone;

/// Caller-owned cache notified of change outcomes
#[async_trait]
pub trait ZoneCache: Send + Sync {
    /// Record the outcome of a batch of change requests
    ///
    /// Called exactly once per `execute_requests`, after every request was
    /// attempted.
    ///
    /// # Parameters
    ///
    /// - `err`: The batch error, `None` on success
    /// - `zone`: The zone the batch was addressed to
    /// - `requests`: The requests of the batch, in input order
    async fn apply_requests(
        &self,
        err: Option<&crate::Error>,
        zone: &HostedZone,
        requests: &[ChangeRequest],
    );

    /// Report that a zone's cached state disagrees with the remote zone
    ///
    /// # Returns
    ///
    /// `true` if cached state was dropped
    async fn report_zone_state_conflict(&self, zone: &HostedZone, err: &crate::Error) -> bool;
}
