//! Remote primitives of the `/domain/zone` API
//!
//! One method per remote call. Each call first waits on the shared rate
//! limiter, then counts one request against the zone before it is sent.
//!
//! | Method              | Call                                           | Counted as       |
//! |---------------------|------------------------------------------------|------------------|
//! | `list_zones`        | `GET /domain/zone`                             | `ListZones`      |
//! | `get_zone_info`     | `GET /domain/zone/{zone}`                      | `ListZones`      |
//! | `list_record_ids`   | `GET /domain/zone/{zone}/record`               | `ListRecords`    |
//! | `get_record`        | `GET /domain/zone/{zone}/record/{id}`          | `ListRecords`    |
//! | `create_record`     | `POST /domain/zone/{zone}/record`              | `CreateRecords`  |
//! | `update_record`     | `PUT /domain/zone/{zone}/record/{id}`          | `UpdateRecords`  |
//! | `delete_record`     | `DELETE /domain/zone/{zone}/record/{id}`       | `DeleteRecords`  |
//! | `refresh_zone`      | `POST /domain/zone/{zone}/refresh`             | `RefreshZone`    |

use std::sync::Arc;
use tracing::debug;
use zonesync_core::{Metrics, RateLimiter, RequestType, Result};

use crate::client::OvhClient;
use crate::types::{NewRecord, RecordInfo, RecordUpdate, ZoneInfo};

/// Rate-limited and metered access to one account
pub struct Access {
    client: OvhClient,
    rate_limiter: Arc<dyn RateLimiter>,
    metrics: Arc<dyn Metrics>,
}

impl std::fmt::Debug for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Access").field("client", &self.client).finish()
    }
}

impl Access {
    /// Wrap a client with its admission control and counters
    pub fn new(client: OvhClient, rate_limiter: Arc<dyn RateLimiter>, metrics: Arc<dyn Metrics>) -> Self {
        Self {
            client,
            rate_limiter,
            metrics,
        }
    }

    async fn admit(&self, zone: &str, request_type: RequestType) {
        self.rate_limiter.accept().await;
        self.metrics.add_zone_requests(zone, request_type, 1);
    }

    /// List the names of all zones visible to the credentials
    pub async fn list_zones(&self) -> Result<Vec<String>> {
        self.admit("", RequestType::ListZones).await;
        let zones: Vec<String> = self.client.get("/domain/zone", &[], "").await?;
        debug!("listed {} zones", zones.len());
        Ok(zones)
    }

    /// Fetch zone metadata
    pub async fn get_zone_info(&self, zone: &str) -> Result<ZoneInfo> {
        self.admit(zone, RequestType::ListZones).await;
        self.client.get(&format!("/domain/zone/{zone}"), &[], zone).await
    }

    /// List record ids, optionally filtered
    ///
    /// An empty `sub_domain` or `field_type` means no filter on that field.
    pub async fn list_record_ids(
        &self,
        zone: &str,
        sub_domain: &str,
        field_type: &str,
    ) -> Result<Vec<u64>> {
        let mut query = Vec::with_capacity(2);
        if !field_type.is_empty() {
            query.push(("fieldType", field_type));
        }
        if !sub_domain.is_empty() {
            query.push(("subDomain", sub_domain));
        }

        self.admit(zone, RequestType::ListRecords).await;
        let ids: Vec<u64> = self
            .client
            .get(&format!("/domain/zone/{zone}/record"), &query, zone)
            .await?;
        debug!(
            "zone {}: {} record ids (subDomain={:?}, fieldType={:?})",
            zone,
            ids.len(),
            sub_domain,
            field_type
        );
        Ok(ids)
    }

    /// Fetch one record
    pub async fn get_record(&self, zone: &str, id: u64) -> Result<RecordInfo> {
        self.admit(zone, RequestType::ListRecords).await;
        self.client
            .get(&format!("/domain/zone/{zone}/record/{id}"), &[], zone)
            .await
    }

    /// List ids, then fetch every record one by one
    ///
    /// Fails as a whole as soon as one fetch fails.
    pub async fn get_records(
        &self,
        zone: &str,
        sub_domain: &str,
        field_type: &str,
    ) -> Result<Vec<RecordInfo>> {
        let ids = self.list_record_ids(zone, sub_domain, field_type).await?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            records.push(self.get_record(zone, id).await?);
        }
        Ok(records)
    }

    /// Create one record
    pub async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<RecordInfo> {
        self.admit(zone, RequestType::CreateRecords).await;
        let created: RecordInfo = self
            .client
            .post(&format!("/domain/zone/{zone}/record"), record, zone)
            .await?;
        debug!("zone {}: created {}", zone, created);
        Ok(created)
    }

    /// Update one record in place
    pub async fn update_record(&self, zone: &str, id: u64, update: &RecordUpdate) -> Result<()> {
        self.admit(zone, RequestType::UpdateRecords).await;
        self.client
            .put(&format!("/domain/zone/{zone}/record/{id}"), update, zone)
            .await?;
        debug!("zone {}: updated record {}", zone, id);
        Ok(())
    }

    /// Delete one record
    pub async fn delete_record(&self, zone: &str, id: u64) -> Result<()> {
        self.admit(zone, RequestType::DeleteRecords).await;
        self.client
            .delete(&format!("/domain/zone/{zone}/record/{id}"), zone)
            .await?;
        debug!("zone {}: deleted record {}", zone, id);
        Ok(())
    }

    /// Publish pending record changes
    pub async fn refresh_zone(&self, zone: &str) -> Result<()> {
        self.admit(zone, RequestType::RefreshZone).await;
        self.client
            .post_empty(&format!("/domain/zone/{zone}/refresh"), zone)
            .await?;
        debug!("zone {}: refreshed", zone);
        Ok(())
    }
}
