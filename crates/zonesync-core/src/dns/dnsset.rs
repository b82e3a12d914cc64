//! Record sets grouped by owner name

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::hostname::normalize_hostname;
use super::record::{RecordSet, RecordType};

/// All record sets at one owner name, at most one per type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsSet {
    /// Normalized owner name
    pub name: String,
    /// Record sets keyed by type
    pub sets: BTreeMap<RecordType, RecordSet>,
}

impl DnsSet {
    /// Create an empty set for a name
    pub fn new(name: &str) -> Self {
        Self {
            name: normalize_hostname(name),
            sets: BTreeMap::new(),
        }
    }

    /// Record set of the given type, if any
    pub fn get(&self, record_type: RecordType) -> Option<&RecordSet> {
        self.sets.get(&record_type)
    }

    /// Number of values across all types
    pub fn record_count(&self) -> usize {
        self.sets.values().map(RecordSet::len).sum()
    }
}

/// Collection of [`DnsSet`]s keyed by normalized owner name
///
/// Ordered so that two reads of an unchanged zone compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsSets {
    sets: BTreeMap<String, DnsSet>,
}

impl DnsSets {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a record set into the collection
    ///
    /// Values of an existing set with the same name and type are merged; the
    /// TTL of the set seen first is kept.
    pub fn add_record_set(&mut self, name: &str, record_set: RecordSet) {
        let key = normalize_hostname(name);
        let dnsset = self
            .sets
            .entry(key.clone())
            .or_insert_with(|| DnsSet::new(&key));

        match dnsset.sets.get_mut(&record_set.record_type) {
            Some(existing) => {
                for value in record_set.values() {
                    existing.add(value);
                }
            }
            None => {
                dnsset.sets.insert(record_set.record_type, record_set);
            }
        }
    }

    /// Replace the record set of its type at a name
    pub fn set_record_set(&mut self, name: &str, record_set: RecordSet) {
        let key = normalize_hostname(name);
        self.sets
            .entry(key.clone())
            .or_insert_with(|| DnsSet::new(&key))
            .sets
            .insert(record_set.record_type, record_set);
    }

    /// Remove the record set of a type at a name, dropping empty names
    pub fn remove_record_set(&mut self, name: &str, record_type: RecordType) -> Option<RecordSet> {
        let key = normalize_hostname(name);
        let dnsset = self.sets.get_mut(&key)?;
        let removed = dnsset.sets.remove(&record_type);
        if dnsset.sets.is_empty() {
            self.sets.remove(&key);
        }
        removed
    }

    /// Set at a name
    pub fn get(&self, name: &str) -> Option<&DnsSet> {
        self.sets.get(&normalize_hostname(name))
    }

    /// Record set of a type at a name
    pub fn get_record_set(&self, name: &str, record_type: RecordType) -> Option<&RecordSet> {
        self.get(name).and_then(|set| set.get(record_type))
    }

    /// Iterate over the sets in name order
    pub fn iter(&self) -> impl Iterator<Item = &DnsSet> {
        self.sets.values()
    }

    /// Owner names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Number of owner names
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of values across all names and types
    pub fn record_count(&self) -> usize {
        self.sets.values().map(DnsSet::record_count).sum()
    }
}
