//! Plugin-based handler registry
//!
//! The registry allows DNS handler factories to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains over provider types.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonesync_core::{HandlerConfig, HandlerContext, HandlerRegistry};
//!
//! let registry = HandlerRegistry::new();
//! zonesync_provider_ovh::register(&registry);
//!
//! let config = HandlerConfig::new(provider_config);
//! let handler = registry.create_handler(&config, HandlerContext::from_config(&config))?;
//! ```

use crate::config::HandlerConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsHandler, DnsHandlerFactory, HandlerContext};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Registry of handler factories keyed by provider type code
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct HandlerRegistry {
    factories: RwLock<HashMap<String, Box<dyn DnsHandlerFactory>>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Box<dyn DnsHandlerFactory>>> {
        self.factories.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Box<dyn DnsHandlerFactory>>> {
        self.factories.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a handler factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type code (e.g., "ovh")
    /// - `factory`: Factory object for creating handler instances
    pub fn register_handler(&self, name: impl Into<String>, factory: Box<dyn DnsHandlerFactory>) {
        self.write().insert(name.into(), factory);
    }

    /// Create a handler from configuration
    ///
    /// The configuration is validated before the factory is invoked.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsHandler>)`: Created handler
    /// - `Err(Error)`: If the provider type is not registered, the
    ///   configuration is invalid or creation fails
    pub fn create_handler(
        &self,
        config: &HandlerConfig,
        context: HandlerContext,
    ) -> Result<Box<dyn DnsHandler>> {
        config.validate()?;

        let provider_type = config.provider.type_name();
        let factories = self.read();
        let factory = factories
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config, context)
    }

    /// List all registered provider types
    pub fn list_handlers(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Check if a provider type is registered
    pub fn has_handler(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }
}
