//! Change requests and their outcomes
//!
//! A [`ChangeRequest`] names one record set and one action. It is built by
//! the caller, consumed once by a handler and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dns::{DnsSets, RecordSet, RecordType, normalize_hostname};

/// Action requested for a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create every value of the set
    Create,
    /// Update the TTL of the existing values
    Update,
    /// Delete every value of the set
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        })
    }
}

/// Instruction to change one record set in one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// Requested action
    pub action: Action,
    /// Absolute owner name
    pub name: String,
    /// Target record set
    pub record_set: RecordSet,
}

impl ChangeRequest {
    /// Create a change request
    pub fn new(action: Action, name: &str, record_set: RecordSet) -> Self {
        Self {
            action,
            name: normalize_hostname(name),
            record_set,
        }
    }

    /// Request creation of a record set
    pub fn create(name: &str, record_set: RecordSet) -> Self {
        Self::new(Action::Create, name, record_set)
    }

    /// Request an update of a record set
    pub fn update(name: &str, record_set: RecordSet) -> Self {
        Self::new(Action::Update, name, record_set)
    }

    /// Request deletion of a record set
    pub fn delete(name: &str, record_set: RecordSet) -> Self {
        Self::new(Action::Delete, name, record_set)
    }

    /// Record type of the target set
    pub fn record_type(&self) -> RecordType {
        self.record_set.record_type
    }

    /// Apply the request to a local snapshot as if it succeeded remotely
    ///
    /// An update only retargets the TTL of a set holding at least one of the
    /// requested values. Values are never added or removed by an update.
    pub fn apply_to(&self, dnssets: &mut DnsSets) {
        match self.action {
            Action::Create => dnssets.add_record_set(&self.name, self.record_set.clone()),
            Action::Update => {
                let Some(existing) = dnssets.get_record_set(&self.name, self.record_type()) else {
                    return;
                };
                if !self.record_set.values().any(|value| existing.contains(value)) {
                    return;
                }
                let mut updated = existing.clone();
                updated.ttl = self.record_set.ttl;
                dnssets.set_record_set(&self.name, updated);
            }
            Action::Delete => {
                let Some(mut existing) = dnssets.remove_record_set(&self.name, self.record_type())
                else {
                    return;
                };
                for value in self.record_set.values() {
                    existing.remove(value);
                }
                if !existing.is_empty() {
                    dnssets.set_record_set(&self.name, existing);
                }
            }
        }
    }
}

impl fmt::Display for ChangeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}({})",
            self.action,
            self.record_set.record_type,
            self.name,
            self.record_set.record_string(),
            self.record_set.ttl
        )
    }
}

/// Terminal state of one change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    /// At least one write succeeded and none failed
    Applied {
        /// Successful write calls
        writes: usize,
        /// Values that had no remote counterpart
        missing: usize,
    },
    /// Every matching remote record already carries the requested TTL
    Unchanged,
    /// Nothing was sent: the record set had no values, or it is an update of
    /// a record set deleted earlier in the same batch
    Skipped,
    /// Nothing to update or delete remotely; the desired state already holds
    NotFound,
    /// A remote call failed
    Failed(String),
}

/// Outcome of one change request within a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutcome {
    /// Requested action
    pub action: Action,
    /// Absolute owner name
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Terminal state
    pub status: ChangeStatus,
}

/// Result of executing a batch of change requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// One outcome per request, in input order
    pub outcomes: Vec<ChangeOutcome>,
    /// Whether the zone refresh was triggered
    pub refreshed: bool,
    /// Whether the batch ran in dry-run mode
    pub dry_run: bool,
}

impl ExecutionReport {
    /// Report for a dry run
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Total successful write calls
    pub fn writes(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                ChangeStatus::Applied { writes, .. } => writes,
                _ => 0,
            })
            .sum()
    }

    /// Number of failed requests
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ChangeStatus::Failed(_)))
            .count()
    }
}
