//! DNS data model
//!
//! - [`RecordSet`]: values sharing one (name, type) pair
//! - [`DnsSet`]: all record sets at one owner name
//! - [`DnsSets`]: a zone's record sets keyed by normalized name

pub mod dnsset;
pub mod hostname;
pub mod record;

pub use dnsset::{DnsSet, DnsSets};
pub use hostname::{absolute_name, align_hostname, normalize_hostname, relative_name};
pub use record::{Record, RecordSet, RecordType};
