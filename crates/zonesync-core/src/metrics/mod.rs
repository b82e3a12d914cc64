// # Metrics Sink Implementations
//
// This module provides implementations of the Metrics trait.

pub mod memory;
pub mod prometheus;

pub use memory::CallCounters;
pub use self::prometheus::PrometheusMetrics;

use crate::traits::{Metrics, RequestType};

/// Sink that drops every count
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn add_zone_requests(&self, _zone: &str, _request_type: RequestType, _count: u64) {}
}
