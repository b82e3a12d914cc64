//! Rate limiter trait
//!
//! Every remote call acquires one token before it is issued. Acquisition
//! waits as long as needed; there is no timeout at this layer.

use async_trait::async_trait;

/// Admission control for outbound remote calls
///
/// Implementations must be safe for concurrent acquisition from multiple
/// tasks, since one limiter may gate several handlers.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until a token is available and consume it
    async fn accept(&self);
}
