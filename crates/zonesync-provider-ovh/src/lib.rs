// # OVHcloud DNS Handler
//
// This crate provides the OVHcloud implementation of `DnsHandler`.
//
// ## Behavior
//
// - One HTTP request per record value; the API has no record-set primitive
// - Every request waits on the shared rate limiter and is counted per zone
// - Zone listing and zone state reading never return partial results
// - Change execution is best effort and refreshes the zone once if anything was written
// - The caller's zone cache is told about every batch exactly once
// - Dry-run mode issues no remote call from `execute_requests`
// - NO retry logic (owned by the caller)
// - NO caching (owned by the caller's zone cache)
// - NO background tasks
//
// ## Security Requirements
//
// - Application secret and consumer key NEVER appear in logs or Debug output
// - Handler construction fails fast on an unknown endpoint or empty credentials
//
// ## API Reference
//
// - List zones: GET `/domain/zone`
// - Zone metadata: GET `/domain/zone/{zone}`
// - List record ids: GET `/domain/zone/{zone}/record?fieldType=...&subDomain=...`
// - Get record: GET `/domain/zone/{zone}/record/{id}`
// - Create record: POST `/domain/zone/{zone}/record`
// - Update record: PUT `/domain/zone/{zone}/record/{id}`
// - Delete record: DELETE `/domain/zone/{zone}/record/{id}`
// - Refresh zone: POST `/domain/zone/{zone}/refresh`

pub mod access;
pub mod client;
pub mod endpoint;
pub mod execute;
pub mod handler;
pub mod state;
pub mod types;
pub mod zones;

pub use access::Access;
pub use client::{Credentials, OvhClient};
pub use handler::OvhHandler;
pub use types::{NewRecord, RecordInfo, RecordUpdate, ZoneInfo};

use zonesync_core::{DnsHandler, DnsHandlerFactory, HandlerConfig, HandlerContext, Result};

/// Provider type code under which the handler registers
pub const TYPE_CODE: &str = "ovh";

/// Factory for creating OVHcloud handlers
pub struct OvhHandlerFactory;

impl DnsHandlerFactory for OvhHandlerFactory {
    fn create(
        &self,
        config: &HandlerConfig,
        context: HandlerContext,
    ) -> Result<Box<dyn DnsHandler>> {
        Ok(Box::new(OvhHandler::new(config, context)?))
    }
}

/// Register the OVHcloud handler with a registry
///
/// # Example
///
/// ```rust
/// use zonesync_core::HandlerRegistry;
///
/// let registry = HandlerRegistry::new();
/// zonesync_provider_ovh::register(&registry);
/// assert!(registry.has_handler("ovh"));
/// ```
pub fn register(registry: &zonesync_core::HandlerRegistry) {
    registry.register_handler(TYPE_CODE, Box::new(OvhHandlerFactory));
}
