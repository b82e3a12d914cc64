//! Prometheus metrics sink
//!
//! Exposes one counter, `<namespace>_zone_requests_total`, labelled by
//! `zone` and `request_type`.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::traits::{Metrics, RequestType};

/// Default metric namespace
const DEFAULT_NAMESPACE: &str = "zonesync";

/// Prometheus-backed metrics sink
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    zone_requests: IntCounterVec,
}

impl PrometheusMetrics {
    /// Create a sink with its own registry
    pub fn new() -> crate::Result<Self> {
        Self::with_registry(Registry::new(), DEFAULT_NAMESPACE)
    }

    /// Create a sink registering into an existing registry
    pub fn with_registry(registry: Registry, namespace: &str) -> crate::Result<Self> {
        let opts = Opts::new(
            format!("{namespace}_zone_requests_total"),
            "Total number of remote DNS API calls by zone and request type",
        );
        let zone_requests = IntCounterVec::new(opts, &["zone", "request_type"])
            .map_err(|e| crate::Error::config(format!("Invalid metric definition: {e}")))?;
        registry
            .register(Box::new(zone_requests.clone()))
            .map_err(|e| crate::Error::config(format!("Failed to register metrics: {e}")))?;
        Ok(Self {
            registry,
            zone_requests,
        })
    }

    /// Registry the counters live in
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current counter value
    pub fn get(&self, zone: &str, request_type: RequestType) -> u64 {
        self.zone_requests
            .with_label_values(&[zone, request_type.as_str()])
            .get()
    }

    /// Render all metrics in the text exposition format
    pub fn gather_text(&self) -> crate::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| crate::Error::Other(format!("Failed to encode metrics: {e}")))?;
        String::from_utf8(buffer).map_err(|e| crate::Error::Other(e.to_string()))
    }
}

impl Metrics for PrometheusMetrics {
    fn add_zone_requests(&self, zone: &str, request_type: RequestType, count: u64) {
        self.zone_requests
            .with_label_values(&[zone, request_type.as_str()])
            .inc_by(count);
    }
}
