//! The OVHcloud DNS handler

use async_trait::async_trait;
use std::sync::Arc;
use zonesync_core::{
    ChangeRequest, DnsHandler, Error, ExecutionReport, HandlerConfig, HandlerContext, HostedZone,
    ProviderConfig, Result, ZoneCache, ZoneState,
};

use crate::access::Access;
use crate::client::{Credentials, OvhClient};
use crate::{TYPE_CODE, execute, state, zones};

/// DNS handler for zones hosted on OVHcloud
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, [`execute_requests`](DnsHandler::execute_requests)
/// logs every request and issues no remote call at all. Listing zones and
/// reading zone state are unaffected.
///
/// # Security
///
/// The Debug implementation does not expose the credentials.
pub struct OvhHandler {
    access: Access,
    cache: Arc<dyn ZoneCache>,
    dry_run: bool,
}

impl std::fmt::Debug for OvhHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhHandler")
            .field("access", &self.access)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl OvhHandler {
    /// Create a handler from configuration
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpointConfig`] if the endpoint is neither a known
    ///   region alias nor an http(s) URL
    /// - [`Error::Config`] for a non-OVH provider configuration or empty credentials
    pub fn new(config: &HandlerConfig, context: HandlerContext) -> Result<Self> {
        let ProviderConfig::Ovh {
            endpoint,
            application_key,
            application_secret,
            consumer_key,
        } = &config.provider
        else {
            return Err(Error::config("Invalid config for OVH provider"));
        };

        let client = OvhClient::new(
            endpoint,
            Credentials::new(
                application_key.as_str(),
                application_secret.as_str(),
                consumer_key.as_str(),
            ),
        )?;
        Ok(Self::with_client(client, config.dry_run, context))
    }

    /// Create a handler around an existing client
    pub fn with_client(client: OvhClient, dry_run: bool, context: HandlerContext) -> Self {
        if dry_run {
            tracing::warn!("OVH handler running in DRY-RUN mode - no changes will be made");
        }
        Self {
            access: Access::new(client, context.rate_limiter, context.metrics),
            cache: context.cache,
            dry_run,
        }
    }

    /// Whether writes are suppressed
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[async_trait]
impl DnsHandler for OvhHandler {
    async fn get_zones(&self) -> Result<Vec<HostedZone>> {
        zones::list_zones(&self.access, TYPE_CODE).await
    }

    async fn get_zone_state(&self, zone: &HostedZone) -> Result<ZoneState> {
        state::read_zone_state(&self.access, zone).await
    }

    async fn execute_requests(
        &self,
        zone: &HostedZone,
        state: &ZoneState,
        requests: &[ChangeRequest],
    ) -> Result<ExecutionReport> {
        let result =
            execute::execute_requests(&self.access, zone, state, requests, self.dry_run).await;
        self.cache
            .apply_requests(result.as_ref().err(), zone, requests)
            .await;
        result
    }

    async fn report_zone_state_conflict(&self, zone: &HostedZone, err: &Error) -> bool {
        self.cache.report_zone_state_conflict(zone, err).await
    }

    fn provider_type(&self) -> &'static str {
        TYPE_CODE
    }
}
