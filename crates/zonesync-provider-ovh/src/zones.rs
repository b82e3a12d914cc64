//! Zone directory
//!
//! Lists every zone the credentials can see and derives each zone's
//! forwarded names from its NS records. The listing is all or nothing: one
//! failing zone aborts the whole pass.

use tracing::{debug, info};
use zonesync_core::dns::{absolute_name, normalize_hostname};
use zonesync_core::{Error, HostedZone, Result};

use crate::access::Access;
use crate::types::RecordInfo;

/// List all zones with their forwarded names and name servers
///
/// Zones keep the order of the remote listing.
pub async fn list_zones(access: &Access, provider_type: &str) -> Result<Vec<HostedZone>> {
    let ids = access
        .list_zones()
        .await
        .map_err(|e| Error::listing("listing DNS zones failed", e))?;

    let mut zones = Vec::with_capacity(ids.len());
    for id in ids {
        let info = access
            .get_zone_info(&id)
            .await
            .map_err(|e| Error::listing(format!("reading DNS zone {id} failed"), e))?;

        let ns_records = access
            .get_records(&id, "", "NS")
            .await
            .map_err(|e| Error::listing(format!("listing NS records of zone {id} failed"), e))?;

        let forwarded = forwarded_names(&id, &ns_records);
        if !forwarded.is_empty() {
            debug!("zone {}: forwarded names {:?}", id, forwarded);
        }

        let domain = if info.name.is_empty() { id.clone() } else { info.name };
        zones.push(
            HostedZone::new(provider_type, id, &domain, forwarded)
                .with_name_servers(info.name_servers),
        );
    }

    info!("found {} DNS zones", zones.len());
    Ok(zones)
}

/// Owner names of NS records below the apex, deduplicated in first-seen order
pub fn forwarded_names(zone: &str, records: &[RecordInfo]) -> Vec<String> {
    let apex = normalize_hostname(zone);
    let mut names: Vec<String> = Vec::new();
    for record in records.iter().filter(|r| r.field_type.eq_ignore_ascii_case("NS")) {
        let name = absolute_name(&record.sub_domain, zone);
        if name != apex && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
