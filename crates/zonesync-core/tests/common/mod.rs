//! Test doubles and common utilities for contract tests
//!
//! This module provides a minimal in-memory handler that follows the
//! `DnsHandler` contract without talking to any remote API.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zonesync_core::error::Result;
use zonesync_core::{
    Action, ChangeOutcome, ChangeRequest, ChangeStatus, DnsHandler, DnsHandlerFactory, DnsSets,
    Error, ExecutionReport, HandlerConfig, HandlerContext, HostedZone, RequestType, ZoneCache,
    ZoneState,
};

/// Handler keeping zones in memory
///
/// Counters and zones are shared between clones made with
/// [`sharing_counters_with`](Self::sharing_counters_with).
pub struct MockDnsHandler {
    zones: Arc<Mutex<BTreeMap<String, DnsSets>>>,
    execute_call_count: Arc<AtomicUsize>,
    read_call_count: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
    context: HandlerContext,
    dry_run: bool,
}

impl MockDnsHandler {
    pub fn new(context: HandlerContext, dry_run: bool) -> Self {
        Self {
            zones: Arc::new(Mutex::new(BTreeMap::new())),
            execute_call_count: Arc::new(AtomicUsize::new(0)),
            read_call_count: Arc::new(AtomicUsize::new(0)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            context,
            dry_run,
        }
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zones: Arc::clone(&other.zones),
            execute_call_count: Arc::clone(&other.execute_call_count),
            read_call_count: Arc::clone(&other.read_call_count),
            fail_writes: Arc::clone(&other.fail_writes),
            context: other.context.clone(),
            dry_run: other.dry_run,
        }
    }

    pub fn with_zone(self, zone: &str) -> Self {
        self.zones
            .lock()
            .unwrap()
            .insert(zone.to_string(), DnsSets::new());
        self
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn execute_call_count(&self) -> usize {
        self.execute_call_count.load(Ordering::SeqCst)
    }

    pub fn read_call_count(&self) -> usize {
        self.read_call_count.load(Ordering::SeqCst)
    }

    pub fn remote(&self, zone: &str) -> DnsSets {
        self.zones
            .lock()
            .unwrap()
            .get(zone)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl DnsHandler for MockDnsHandler {
    async fn get_zones(&self) -> Result<Vec<HostedZone>> {
        self.context.rate_limiter.accept().await;
        self.context
            .metrics
            .add_zone_requests("", RequestType::ListZones, 1);
        let zones = self.zones.lock().unwrap();
        Ok(zones
            .keys()
            .map(|name| HostedZone::new("mock", name.as_str(), name, Vec::new()))
            .collect())
    }

    async fn get_zone_state(&self, zone: &HostedZone) -> Result<ZoneState> {
        self.read_call_count.fetch_add(1, Ordering::SeqCst);
        self.context.rate_limiter.accept().await;
        self.context
            .metrics
            .add_zone_requests(&zone.id, RequestType::ListRecords, 1);
        let zones = self.zones.lock().unwrap();
        zones
            .get(&zone.id)
            .cloned()
            .map(ZoneState::new)
            .ok_or_else(|| Error::remote_api(format!("GET {}", zone.id), &zone.id, "no such zone"))
    }

    async fn execute_requests(
        &self,
        zone: &HostedZone,
        _state: &ZoneState,
        requests: &[ChangeRequest],
    ) -> Result<ExecutionReport> {
        self.execute_call_count.fetch_add(1, Ordering::SeqCst);

        let result = if self.dry_run {
            Ok(ExecutionReport::dry_run())
        } else if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::PartialBatchFailure {
                zone: zone.id.clone(),
                failed: requests.len(),
                total: requests.len(),
                source: Box::new(Error::remote_api("POST", &zone.id, "write refused")),
            })
        } else {
            let mut zones = self.zones.lock().unwrap();
            let sets = zones.entry(zone.id.clone()).or_default();
            let mut report = ExecutionReport::default();
            for request in requests {
                request.apply_to(sets);
                let kind = match request.action {
                    Action::Create => RequestType::CreateRecords,
                    Action::Update => RequestType::UpdateRecords,
                    Action::Delete => RequestType::DeleteRecords,
                };
                let writes = request.record_set.len();
                self.context
                    .metrics
                    .add_zone_requests(&zone.id, kind, writes as u64);
                report.outcomes.push(ChangeOutcome {
                    action: request.action,
                    name: request.name.clone(),
                    record_type: request.record_type(),
                    status: ChangeStatus::Applied { writes, missing: 0 },
                });
            }
            report.refreshed = report.writes() > 0;
            Ok(report)
        };

        self.context
            .cache
            .apply_requests(result.as_ref().err(), zone, requests)
            .await;
        result
    }

    async fn report_zone_state_conflict(&self, zone: &HostedZone, err: &Error) -> bool {
        self.context.cache.report_zone_state_conflict(zone, err).await
    }

    fn provider_type(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out handlers that share one backing store
pub struct MockDnsHandlerFactory {
    zones: Arc<Mutex<BTreeMap<String, DnsSets>>>,
    created: Arc<AtomicUsize>,
}

impl MockDnsHandlerFactory {
    pub fn new() -> Self {
        Self {
            zones: Arc::new(Mutex::new(BTreeMap::new())),
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn created(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.created)
    }
}

impl DnsHandlerFactory for MockDnsHandlerFactory {
    fn create(&self, config: &HandlerConfig, context: HandlerContext) -> Result<Box<dyn DnsHandler>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let mut handler = MockDnsHandler::new(context, config.dry_run);
        handler.zones = Arc::clone(&self.zones);
        Ok(Box::new(handler))
    }
}

/// Zone cache double counting notifications
#[derive(Clone, Default)]
pub struct CountingZoneCache {
    pub applied: Arc<AtomicUsize>,
    pub failed: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl ZoneCache for CountingZoneCache {
    async fn apply_requests(&self, err: Option<&Error>, _zone: &HostedZone, _requests: &[ChangeRequest]) {
        self.applied.fetch_add(1, Ordering::SeqCst);
        if err.is_some() {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn report_zone_state_conflict(&self, _zone: &HostedZone, _err: &Error) -> bool {
        false
    }
}
