//! Change executor
//!
//! Requests run in input order, one remote write per record value. Update and
//! delete first look up the existing records of the (subDomain, fieldType)
//! pair and match them by value. A value with no remote counterpart is a
//! no-op. Failures do not stop the batch; the first one is returned once
//! every request was attempted. The zone is refreshed once if anything was
//! written.

use std::collections::HashSet;
use tracing::{debug, error, info, warn};
use zonesync_core::dns::{align_hostname, normalize_hostname, relative_name};
use zonesync_core::{
    Action, ChangeOutcome, ChangeRequest, ChangeStatus, Error, ExecutionReport, HostedZone,
    RecordSet, RecordType, Result, ZoneState,
};

use crate::access::Access;
use crate::types::{NewRecord, RecordInfo, RecordUpdate};

/// Execute a batch of change requests against one zone
///
/// # Returns
///
/// - `Ok(ExecutionReport)`: no request failed
/// - `Err(Error::PartialBatchFailure)`: at least one request failed, wrapping the first error
/// - `Err(Error::RemoteApi)`: every request succeeded but the refresh failed
pub async fn execute_requests(
    access: &Access,
    zone: &HostedZone,
    state: &ZoneState,
    requests: &[ChangeRequest],
    dry_run: bool,
) -> Result<ExecutionReport> {
    if dry_run {
        for request in requests {
            info!("[DRY-RUN] would {} in zone {}", request, zone.id);
        }
        info!("[DRY-RUN] no changes applied to zone {}", zone.id);
        return Ok(ExecutionReport::dry_run());
    }

    let mut batch = Batch::new(access, zone);
    let mut report = ExecutionReport::default();

    for request in requests {
        let status = batch.execute(request, state).await;
        report.outcomes.push(ChangeOutcome {
            action: request.action,
            name: request.name.clone(),
            record_type: request.record_type(),
            status,
        });
    }

    if batch.updated {
        match access.refresh_zone(&zone.id).await {
            Ok(()) => report.refreshed = true,
            Err(e) => {
                error!("refreshing zone {} failed: {}", zone.id, e);
                batch.remember(e);
            }
        }
    }

    match batch.first_error {
        None => {
            info!(
                "zone {}: {} change requests done, {} writes",
                zone.id,
                requests.len(),
                report.writes()
            );
            Ok(report)
        }
        Some(err) if batch.failed == 0 => Err(err),
        Some(err) => Err(Error::PartialBatchFailure {
            zone: zone.id.clone(),
            failed: batch.failed,
            total: requests.len(),
            source: Box::new(err),
        }),
    }
}

struct Batch<'a> {
    access: &'a Access,
    zone: &'a HostedZone,
    first_error: Option<Error>,
    failed: usize,
    updated: bool,
    deleted: HashSet<(String, RecordType)>,
}

/// Per-request write tally
#[derive(Default)]
struct Tally {
    writes: usize,
    missing: usize,
    unchanged: usize,
    failure: Option<String>,
}

impl Tally {
    fn status(self) -> ChangeStatus {
        if let Some(msg) = self.failure {
            ChangeStatus::Failed(msg)
        } else if self.writes > 0 {
            ChangeStatus::Applied {
                writes: self.writes,
                missing: self.missing,
            }
        } else if self.unchanged > 0 {
            ChangeStatus::Unchanged
        } else {
            ChangeStatus::NotFound
        }
    }
}

impl<'a> Batch<'a> {
    fn new(access: &'a Access, zone: &'a HostedZone) -> Self {
        Self {
            access,
            zone,
            first_error: None,
            failed: 0,
            updated: false,
            deleted: HashSet::new(),
        }
    }

    fn remember(&mut self, err: Error) {
        if self.first_error.is_none() {
            self.first_error = Some(err);
        }
    }

    fn fail(&mut self, tally: &mut Tally, err: Error) {
        if tally.failure.is_none() {
            tally.failure = Some(err.to_string());
        }
        self.remember(err);
    }

    async fn execute(&mut self, request: &ChangeRequest, state: &ZoneState) -> ChangeStatus {
        let set = &request.record_set;
        let key = (request.name.clone(), set.record_type);

        let Some(sub_domain) = relative_name(&request.name, &self.zone.domain) else {
            let err = Error::invalid_input(format!(
                "{} does not belong to zone {}",
                request.name, self.zone.domain
            ));
            error!("{}: {}", request, err);
            self.failed += 1;
            let status = ChangeStatus::Failed(err.to_string());
            self.remember(err);
            return status;
        };

        if set.is_empty() {
            warn!("skipping {}: no records", request);
            return ChangeStatus::Skipped;
        }

        info!(
            "{} {} record set {}[{}]: {}({})",
            request.action,
            set.record_type,
            request.name,
            self.zone.id,
            set.record_string(),
            set.ttl
        );

        let mut tally = Tally::default();
        match request.action {
            Action::Create => {
                if let Some(current) = state.dnssets().get_record_set(&request.name, set.record_type) {
                    debug!("{} already holds {} in current state", request.name, current.record_string());
                }
                self.deleted.remove(&key);
                self.create(&sub_domain, set, &mut tally).await;
            }
            Action::Update => {
                if self.deleted.contains(&key) {
                    warn!("skipping {}: record set deleted earlier in this batch", request);
                    return ChangeStatus::Skipped;
                }
                if let Some(existing) = self.lookup(&sub_domain, set.record_type, &mut tally).await {
                    self.update(&sub_domain, set, &existing, &mut tally).await;
                }
            }
            Action::Delete => {
                self.deleted.insert(key);
                if let Some(existing) = self.lookup(&sub_domain, set.record_type, &mut tally).await {
                    self.delete(&sub_domain, set, &existing, &mut tally).await;
                }
            }
        }

        if tally.writes > 0 {
            self.updated = true;
        }
        if tally.failure.is_some() {
            self.failed += 1;
        }
        tally.status()
    }

    async fn create(&mut self, sub_domain: &str, set: &RecordSet, tally: &mut Tally) {
        for value in set.values() {
            let record = NewRecord {
                field_type: set.record_type.as_str().to_string(),
                sub_domain: sub_domain.to_string(),
                target: wire_target(set.record_type, value),
                ttl: set.ttl,
            };
            match self.access.create_record(&self.zone.id, &record).await {
                Ok(_) => tally.writes += 1,
                Err(e) => {
                    error!("creating {} {} in zone {} failed: {}", set.record_type, value, self.zone.id, e);
                    self.fail(tally, e);
                }
            }
        }
    }

    async fn update(
        &mut self,
        sub_domain: &str,
        set: &RecordSet,
        existing: &[RecordInfo],
        tally: &mut Tally,
    ) {
        for value in set.values() {
            let matches = matching(existing, set.record_type, value);
            if matches.is_empty() {
                self.missing(sub_domain, set.record_type, value, tally);
                continue;
            }
            for record in matches {
                if record.ttl == set.ttl {
                    tally.unchanged += 1;
                    continue;
                }
                match self
                    .access
                    .update_record(&self.zone.id, record.id, &RecordUpdate::ttl(set.ttl))
                    .await
                {
                    Ok(()) => tally.writes += 1,
                    Err(e) => {
                        error!("updating {} failed: {}", record, e);
                        self.fail(tally, e);
                    }
                }
            }
        }
    }

    async fn delete(
        &mut self,
        sub_domain: &str,
        set: &RecordSet,
        existing: &[RecordInfo],
        tally: &mut Tally,
    ) {
        for value in set.values() {
            let matches = matching(existing, set.record_type, value);
            if matches.is_empty() {
                self.missing(sub_domain, set.record_type, value, tally);
                continue;
            }
            for record in matches {
                match self.access.delete_record(&self.zone.id, record.id).await {
                    Ok(()) => tally.writes += 1,
                    Err(e) => {
                        error!("deleting {} failed: {}", record, e);
                        self.fail(tally, e);
                    }
                }
            }
        }
    }

    /// Fetch the remote records of one (subDomain, fieldType) pair
    async fn lookup(
        &mut self,
        sub_domain: &str,
        record_type: RecordType,
        tally: &mut Tally,
    ) -> Option<Vec<RecordInfo>> {
        match self
            .access
            .get_records(&self.zone.id, sub_domain, record_type.as_str())
            .await
        {
            Ok(records) => Some(
                records
                    .into_iter()
                    .filter(|r| {
                        normalize_hostname(&r.sub_domain) == sub_domain
                            && RecordType::parse(&r.field_type) == Some(record_type)
                    })
                    .collect(),
            ),
            Err(e) => {
                error!(
                    "looking up {} records of {:?} in zone {} failed: {}",
                    record_type, sub_domain, self.zone.id, e
                );
                self.fail(tally, e);
                None
            }
        }
    }

    fn missing(&self, sub_domain: &str, record_type: RecordType, value: &str, tally: &mut Tally) {
        let not_found = Error::record_not_found(&self.zone.id, sub_domain, record_type.as_str());
        warn!("{} (target {}), nothing to do", not_found, value);
        tally.missing += 1;
    }
}

/// Remote records carrying a value, compared in normalized form
fn matching<'r>(existing: &'r [RecordInfo], record_type: RecordType, value: &str) -> Vec<&'r RecordInfo> {
    existing
        .iter()
        .filter(|r| record_type.normalize_value(&r.target) == value)
        .collect()
}

/// Value as sent on the wire; CNAME targets are absolute
fn wire_target(record_type: RecordType, value: &str) -> String {
    match record_type {
        RecordType::Cname => align_hostname(value),
        RecordType::A | RecordType::Txt => value.to_string(),
    }
}
