//! Hosted zones and zone state snapshots

use serde::{Deserialize, Serialize};

use crate::dns::{DnsSets, normalize_hostname};

/// A zone visible to the provider credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    /// Provider type code the zone was listed by
    pub provider_type: String,
    /// Remote identifier (the zone name for OVH)
    pub id: String,
    /// Normalized domain name
    pub domain: String,
    /// Sub-names delegated away via NS records
    pub forwarded_domains: Vec<String>,
    /// Name servers advertised for the zone
    pub name_servers: Vec<String>,
    /// Private zones are not supported by every provider
    pub is_private: bool,
}

impl HostedZone {
    /// Create a public zone
    pub fn new(
        provider_type: impl Into<String>,
        id: impl Into<String>,
        domain: &str,
        forwarded_domains: Vec<String>,
    ) -> Self {
        Self {
            provider_type: provider_type.into(),
            id: id.into(),
            domain: normalize_hostname(domain),
            forwarded_domains,
            name_servers: Vec::new(),
            is_private: false,
        }
    }

    /// Attach the advertised name servers
    pub fn with_name_servers(mut self, name_servers: Vec<String>) -> Self {
        self.name_servers = name_servers;
        self
    }

    /// Whether a name is delegated away from this zone
    pub fn is_forwarded(&self, name: &str) -> bool {
        let name = normalize_hostname(name);
        self.forwarded_domains
            .iter()
            .any(|f| name == *f || name.ends_with(&format!(".{f}")))
    }
}

/// Snapshot of a zone's synchronized record sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneState {
    dnssets: DnsSets,
}

impl ZoneState {
    /// Wrap a record set collection
    pub fn new(dnssets: DnsSets) -> Self {
        Self { dnssets }
    }

    /// Record sets of the zone
    pub fn dnssets(&self) -> &DnsSets {
        &self.dnssets
    }

    /// Mutable access, used when a cache applies executed changes
    pub fn dnssets_mut(&mut self) -> &mut DnsSets {
        &mut self.dnssets
    }

    /// Consume into the record set collection
    pub fn into_dnssets(self) -> DnsSets {
        self.dnssets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_matches_subtree() {
        let zone = HostedZone::new("ovh", "example.com", "Example.com.", vec!["sub.example.com".to_string()]);
        assert_eq!(zone.domain, "example.com");
        assert!(!zone.is_private);
        assert!(zone.is_forwarded("sub.example.com"));
        assert!(zone.is_forwarded("a.sub.example.com."));
        assert!(!zone.is_forwarded("xsub.example.com"));
        assert!(!zone.is_forwarded("www.example.com"));
    }
}
