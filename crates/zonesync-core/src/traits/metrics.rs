//! Metrics sink trait

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of remote operation a call is counted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Zone listing and zone metadata
    ListZones,
    /// Record id listing and record body fetches
    ListRecords,
    /// Record creation
    CreateRecords,
    /// Record updates
    UpdateRecords,
    /// Record deletion
    DeleteRecords,
    /// Zone refresh triggers
    RefreshZone,
}

impl RequestType {
    /// Label value used by metric exporters
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::ListZones => "list_zones",
            RequestType::ListRecords => "list_records",
            RequestType::CreateRecords => "create_records",
            RequestType::UpdateRecords => "update_records",
            RequestType::DeleteRecords => "delete_records",
            RequestType::RefreshZone => "refresh_zone",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for per-zone remote call counts
pub trait Metrics: Send + Sync {
    /// Count `count` calls of class `request_type` issued for `zone`
    ///
    /// Account-wide calls use an empty zone.
    fn add_zone_requests(&self, zone: &str, request_type: RequestType, count: u64);
}
