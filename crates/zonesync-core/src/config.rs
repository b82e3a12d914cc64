//! Configuration types for zone synchronization
//!
//! Configuration is an immutable value handed to a handler at construction.
//! Nothing here is read from process-wide state, so independently configured
//! handlers can live side by side.

use serde::{Deserialize, Serialize};

/// Handler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Dry-run mode: log intended writes, issue no remote calls
    #[serde(default)]
    pub dry_run: bool,

    /// Admission control for remote calls
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl HandlerConfig {
    /// Create a configuration for the given provider with defaults
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            dry_run: false,
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the rate limit configuration
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// OVHcloud provider
    Ovh {
        /// Region alias (e.g. "ovh-eu") or explicit base URL
        endpoint: String,
        /// Application key
        application_key: String,
        /// Application secret
        application_secret: String,
        /// Consumer key
        consumer_key: String,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

// Secrets stay out of logs
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Ovh {
                endpoint,
                application_key,
                ..
            } => f
                .debug_struct("Ovh")
                .field("endpoint", endpoint)
                .field("application_key", application_key)
                .field("application_secret", &"<REDACTED>")
                .field("consumer_key", &"<REDACTED>")
                .finish(),
            ProviderConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Ovh {
                endpoint,
                application_key,
                application_secret,
                consumer_key,
            } => {
                if endpoint.is_empty() {
                    return Err(crate::Error::config("OVH endpoint cannot be empty"));
                }
                if application_key.is_empty() {
                    return Err(crate::Error::config("OVH application key cannot be empty"));
                }
                if application_secret.is_empty() {
                    return Err(crate::Error::config(
                        "OVH application secret cannot be empty",
                    ));
                }
                if consumer_key.is_empty() {
                    return Err(crate::Error::config("OVH consumer key cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Ovh { .. } => "ovh",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Rate limit configuration
///
/// Every remote call takes one token. The bucket refills at
/// `requests_per_second` and holds at most `burst` tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Whether admission control is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Sustained request rate
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Maximum burst size
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl RateLimitConfig {
    /// Configuration with admission control turned off
    pub fn unlimited() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Validate the rate limit configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.enabled {
            return Ok(());
        }
        if self.requests_per_second == 0 {
            return Err(crate::Error::config("Rate limit requests_per_second must be > 0"));
        }
        if self.burst == 0 {
            return Err(crate::Error::config("Rate limit burst must be > 0"));
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    20
}
