//! Core traits for zone synchronization
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsHandler`]: List zones, read zone state, execute change requests
//! - [`RateLimiter`]: Admission control for remote calls
//! - [`Metrics`]: Per-zone call counters
//! - [`ZoneCache`]: Caller-owned cache told about change outcomes

pub mod dns_handler;
pub mod metrics;
pub mod rate_limiter;
pub mod zone_cache;

pub use dns_handler::{DnsHandler, DnsHandlerFactory, HandlerContext};
pub use metrics::{Metrics, RequestType};
pub use rate_limiter::RateLimiter;
pub use zone_cache::ZoneCache;
