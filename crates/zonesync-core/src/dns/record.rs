//! Records and record sets

use serde::{Deserialize, Serialize};
use std::fmt;

use super::hostname::normalize_hostname;

/// DNS record types that are synchronized
///
/// Every other type found in a remote zone is ignored on read and never
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address
    #[serde(rename = "A")]
    A,
    /// Canonical name
    #[serde(rename = "CNAME")]
    Cname,
    /// Text
    #[serde(rename = "TXT")]
    Txt,
}

impl RecordType {
    /// All synchronized types
    pub const SUPPORTED: [RecordType; 3] = [RecordType::A, RecordType::Cname, RecordType::Txt];

    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
        }
    }

    /// Parse a wire type name, `None` for unsupported types
    pub fn parse(field_type: &str) -> Option<Self> {
        match field_type.to_ascii_uppercase().as_str() {
            "A" => Some(RecordType::A),
            "CNAME" => Some(RecordType::Cname),
            "TXT" => Some(RecordType::Txt),
            _ => None,
        }
    }

    /// Normalize a value of this type
    ///
    /// CNAME targets are hostnames and get the canonical absolute form
    /// (lowercase, no trailing dot). Other values are kept verbatim.
    pub fn normalize_value(&self, value: &str) -> String {
        match self {
            RecordType::Cname => normalize_hostname(value),
            RecordType::A | RecordType::Txt => value.to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single value of a record set
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Record value (address, target or text)
    pub value: String,
}

impl Record {
    /// Create a new record
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// The values sharing one (owner name, type) pair, with a single TTL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Record type
    pub record_type: RecordType,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Values, without duplicates
    pub records: Vec<Record>,
}

impl RecordSet {
    /// Create an empty record set
    pub fn new(record_type: RecordType, ttl: u32) -> Self {
        Self {
            record_type,
            ttl,
            records: Vec::new(),
        }
    }

    /// Create a record set from values, normalizing them for the type
    pub fn with_values<I, S>(record_type: RecordType, ttl: u32, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new(record_type, ttl);
        for value in values {
            set.add(value.as_ref());
        }
        set
    }

    /// Add a value; returns `false` if it was already present
    pub fn add(&mut self, value: &str) -> bool {
        let record = Record::new(self.record_type.normalize_value(value));
        if self.records.contains(&record) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Remove a value; returns `true` if it was present
    pub fn remove(&mut self, value: &str) -> bool {
        let value = self.record_type.normalize_value(value);
        let before = self.records.len();
        self.records.retain(|r| r.value != value);
        self.records.len() != before
    }

    /// Whether the set holds the given value
    pub fn contains(&self, value: &str) -> bool {
        let value = self.record_type.normalize_value(value);
        self.records.iter().any(|r| r.value == value)
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set has no values
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the values
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.value.as_str())
    }

    /// Compact representation for logs
    pub fn record_string(&self) -> String {
        let values: Vec<&str> = self.values().collect();
        format!("[{}]", values.join(", "))
    }
}
