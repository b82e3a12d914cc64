// # zonesync-core
//
// Core library for synchronizing declared DNS record sets against remote
// authoritative zones that are only reachable through per-record REST APIs.
//
// ## Architecture Overview
//
// This library provides the model and the seams a provider handler plugs into:
// - **DnsHandler**: Trait for listing zones, reading zone state and executing changes
// - **RateLimiter**: Trait for admission control shared by every remote call
// - **Metrics**: Trait for per-zone call counters
// - **ZoneCache**: Trait for the caller-owned cache told about change outcomes
// - **HandlerRegistry**: Plugin-based registry for handler factories
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Desired state is decided by the caller; handlers
//    only read remote state and execute change requests
// 2. **One Record Per Call**: No remote batching is implied; call counts are explicit
// 3. **Fail-Fast Reads**: Zone listings and zone states are never partial
// 4. **Best-Effort Writes**: A failing record set does not block independent ones
// 5. **Explicit Configuration**: Dry-run and endpoint selection are construction-time values

pub mod cache;
pub mod change;
pub mod config;
pub mod dns;
pub mod error;
pub mod metrics;
pub mod ratelimit;
pub mod registry;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use cache::MemoryZoneCache;
pub use change::{Action, ChangeOutcome, ChangeRequest, ChangeStatus, ExecutionReport};
pub use config::{HandlerConfig, ProviderConfig, RateLimitConfig};
pub use dns::{DnsSet, DnsSets, Record, RecordSet, RecordType};
pub use error::{Error, Result};
pub use registry::HandlerRegistry;
pub use traits::{DnsHandler, DnsHandlerFactory, HandlerContext, Metrics, RateLimiter, RequestType, ZoneCache};
pub use zone::{HostedZone, ZoneState};
