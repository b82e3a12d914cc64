// # Zone Cache Implementations
//
// This module provides an in-memory implementation of the ZoneCache trait.

pub mod memory;

pub use memory::{CachedZoneState, MemoryZoneCache};
