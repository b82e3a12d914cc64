//! Zone state reader
//!
//! Reading a zone costs one id listing plus one fetch per record. Any failure
//! discards what was read so far.

use tracing::{debug, trace};
use zonesync_core::dns::absolute_name;
use zonesync_core::{DnsSets, Error, HostedZone, RecordSet, RecordType, Result, ZoneState};

use crate::access::Access;
use crate::types::RecordInfo;

/// Read the A, CNAME and TXT record sets of a zone
pub async fn read_zone_state(access: &Access, zone: &HostedZone) -> Result<ZoneState> {
    let records = access
        .get_records(&zone.id, "", "")
        .await
        .map_err(|e| Error::listing(format!("zone state listing failed for {}", zone.id), e))?;

    let dnssets = build_dnssets(&zone.domain, &records);
    debug!(
        "zone {}: {} of {} records synchronized in {} names",
        zone.id,
        dnssets.record_count(),
        records.len(),
        dnssets.len()
    );
    Ok(ZoneState::new(dnssets))
}

/// Merge fetched records into record sets keyed by absolute owner name
pub fn build_dnssets(zone: &str, records: &[RecordInfo]) -> DnsSets {
    let mut dnssets = DnsSets::new();
    for record in records {
        let Some(record_type) = RecordType::parse(&record.field_type) else {
            trace!("zone {}: ignoring {}", zone, record);
            continue;
        };
        let name = absolute_name(&record.sub_domain, zone);
        let set = RecordSet::with_values(record_type, record.ttl, [record.target.as_str()]);
        dnssets.add_record_set(&name, set);
    }
    dnssets
}
