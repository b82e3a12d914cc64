//! Wire entities of the `/domain/zone` API

use serde::{Deserialize, Serialize};
use std::fmt;

/// A record as returned by `GET /domain/zone/{zone}/record/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInfo {
    /// Remote id, required for update and delete
    #[serde(default)]
    pub id: u64,
    /// Zone name
    #[serde(default)]
    pub zone: String,
    /// Owner name relative to the zone apex, empty for the apex
    #[serde(default)]
    pub sub_domain: String,
    /// Record type
    pub field_type: String,
    /// Record value
    pub target: String,
    /// Time-to-live, 0 meaning the zone default
    #[serde(default)]
    pub ttl: u32,
}

impl fmt::Display for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record[id: {}, zone: {}, subdomain: {}, type: {}, target: {}]",
            self.id, self.zone, self.sub_domain, self.field_type, self.target
        )
    }
}

/// Body of `POST /domain/zone/{zone}/record`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    /// Record type
    pub field_type: String,
    /// Owner name relative to the zone apex
    pub sub_domain: String,
    /// Record value
    pub target: String,
    /// Time-to-live
    pub ttl: u32,
}

/// Partial body of `PUT /domain/zone/{zone}/record/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    /// New owner name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_domain: Option<String>,
    /// New value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// New time-to-live
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl RecordUpdate {
    /// Update of the TTL only
    pub fn ttl(ttl: u32) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }
}

/// Zone metadata as returned by `GET /domain/zone/{zone}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    /// Zone name
    pub name: String,
    /// Name servers serving the zone
    #[serde(default)]
    pub name_servers: Vec<String>,
    /// Whether DNSSEC can be enabled
    #[serde(default)]
    pub dnssec_supported: bool,
    /// Whether anycast is enabled
    #[serde(default)]
    pub has_dns_anycast: bool,
    /// Last modification timestamp
    #[serde(default)]
    pub last_update: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_info_from_wire() {
        let json = serde_json::json!({
            "id": 5061431,
            "zone": "example.com",
            "subDomain": "www",
            "fieldType": "A",
            "target": "1.2.3.4",
            "ttl": 300
        });
        let record: RecordInfo = serde_json::from_value(json).unwrap();
        assert_eq!(record.id, 5061431);
        assert_eq!(record.sub_domain, "www");
        assert_eq!(
            record.to_string(),
            "record[id: 5061431, zone: example.com, subdomain: www, type: A, target: 1.2.3.4]"
        );
    }

    #[test]
    fn test_apex_record_without_subdomain() {
        let json = serde_json::json!({"id": 1, "zone": "example.com", "fieldType": "NS", "target": "dns1.ovh.net.", "ttl": 0});
        let record: RecordInfo = serde_json::from_value(json).unwrap();
        assert_eq!(record.sub_domain, "");
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let body = serde_json::to_value(RecordUpdate::ttl(60)).unwrap();
        assert_eq!(body, serde_json::json!({"ttl": 60}));
    }

    #[test]
    fn test_new_record_wire_names() {
        let body = serde_json::to_value(NewRecord {
            field_type: "A".to_string(),
            sub_domain: "api".to_string(),
            target: "5.6.7.8".to_string(),
            ttl: 300,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"fieldType": "A", "subDomain": "api", "target": "5.6.7.8", "ttl": 300})
        );
    }

    #[test]
    fn test_zone_info_from_wire() {
        let json = serde_json::json!({
            "name": "example.com",
            "nameServers": ["dns1.ovh.net", "ns1.ovh.net"],
            "dnssecSupported": true,
            "hasDnsAnycast": false,
            "lastUpdate": "2024-01-01T00:00:00+01:00"
        });
        let info: ZoneInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.name_servers.len(), 2);
        assert!(info.dnssec_supported);
    }
}
