// # zonesyncd - Zone Inventory Daemon
//
// Thin integration layer around zonesync-core. No DNS logic lives here.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering handlers and building the collaborators they share
// 4. Running periodic inventory passes: list zones, read stale zone states
//    into the in-memory cache
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### OVHcloud API
// - `OVH_ENDPOINT`: Region alias (ovh-eu, ovh-ca, ...) or base URL (default: ovh-eu)
// - `OVH_APPLICATION_KEY`: Application key
// - `OVH_APPLICATION_SECRET`: Application secret
// - `OVH_CONSUMER_KEY`: Consumer key
//
// ### Behavior
// - `ZONESYNC_DRY_RUN`: Suppress every write (true/false, default: false)
// - `ZONESYNC_RATE_LIMIT_QPS`: Sustained API calls per second (default: 10)
// - `ZONESYNC_RATE_LIMIT_BURST`: Burst size (default: 20)
// - `ZONESYNC_INTERVAL_SECS`: Seconds between inventory passes (default: 300)
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//
// ## Example
//
// ```bash
// export OVH_ENDPOINT=ovh-eu
// export OVH_APPLICATION_KEY=...
// export OVH_APPLICATION_SECRET=...
// export OVH_CONSUMER_KEY=...
// export ZONESYNC_DRY_RUN=true
//
// zonesyncd
// ```

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use zonesync_core::metrics::PrometheusMetrics;
use zonesync_core::{
    DnsHandler, HandlerConfig, HandlerContext, HandlerRegistry, MemoryZoneCache, ProviderConfig,
    RateLimitConfig,
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Passes a cached zone state survives before it is read again
const STATE_REFRESH_PASSES: u32 = 4;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ZonesyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ZonesyncExitCode> for ExitCode {
    fn from(code: ZonesyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    endpoint: String,
    application_key: String,
    application_secret: String,
    consumer_key: String,
    dry_run: bool,
    rate_limit_qps: u32,
    rate_limit_burst: u32,
    interval_secs: u64,
    log_level: String,
}

// Secrets stay out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .field("rate_limit_qps", &self.rate_limit_qps)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .field("interval_secs", &self.interval_secs)
            .finish()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, value, e)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &str) -> Result<bool> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => anyhow::bail!("{} must be true or false. Got: {}", name, other),
        },
        Err(_) => Ok(false),
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: env::var("OVH_ENDPOINT").unwrap_or_else(|_| "ovh-eu".to_string()),
            application_key: env::var("OVH_APPLICATION_KEY")
                .context("OVH_APPLICATION_KEY is required")?,
            application_secret: env::var("OVH_APPLICATION_SECRET")
                .context("OVH_APPLICATION_SECRET is required")?,
            consumer_key: env::var("OVH_CONSUMER_KEY").context("OVH_CONSUMER_KEY is required")?,
            dry_run: parse_bool("ZONESYNC_DRY_RUN")?,
            rate_limit_qps: parse_var("ZONESYNC_RATE_LIMIT_QPS", 10)?,
            rate_limit_burst: parse_var("ZONESYNC_RATE_LIMIT_BURST", 20)?,
            interval_secs: parse_var("ZONESYNC_INTERVAL_SECS", 300)?,
            log_level: env::var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Credentials and the endpoint are checked again by the handler; this
    /// catches the common mistakes with an actionable message.
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("OVH_APPLICATION_KEY", &self.application_key),
            ("OVH_APPLICATION_SECRET", &self.application_secret),
            ("OVH_CONSUMER_KEY", &self.consumer_key),
        ] {
            if value.is_empty() {
                anyhow::bail!("{} is required. Set it via: export {}=...", name, name);
            }
            let lower = value.to_lowercase();
            if lower.contains("replace_me") || lower.contains("your_") || lower == "changeme" {
                anyhow::bail!("{} appears to be a placeholder", name);
            }
        }

        #[cfg(feature = "ovh")]
        zonesync_provider_ovh::endpoint::resolve_endpoint(&self.endpoint)
            .map_err(|e| anyhow::anyhow!("OVH_ENDPOINT: {}", e))?;

        if !(1..=1000).contains(&self.rate_limit_qps) {
            anyhow::bail!(
                "ZONESYNC_RATE_LIMIT_QPS must be between 1 and 1000. Got: {}",
                self.rate_limit_qps
            );
        }

        if self.rate_limit_burst == 0 {
            anyhow::bail!("ZONESYNC_RATE_LIMIT_BURST must be at least 1");
        }

        if !(10..=86400).contains(&self.interval_secs) {
            anyhow::bail!(
                "ZONESYNC_INTERVAL_SECS must be between 10 and 86400 seconds. Got: {}",
                self.interval_secs
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn handler_config(&self) -> HandlerConfig {
        HandlerConfig::new(ProviderConfig::Ovh {
            endpoint: self.endpoint.clone(),
            application_key: self.application_key.clone(),
            application_secret: self.application_secret.clone(),
            consumer_key: self.consumer_key.clone(),
        })
        .with_dry_run(self.dry_run)
        .with_rate_limit(RateLimitConfig {
            enabled: true,
            requests_per_second: self.rate_limit_qps,
            burst: self.rate_limit_burst,
        })
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ZonesyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ZonesyncExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZonesyncExitCode::ConfigError.into();
    }

    info!("Starting zonesyncd daemon");
    debug!("Configuration loaded: {:?}", config);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZonesyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            ZonesyncExitCode::RuntimeError
        } else {
            ZonesyncExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon until a shutdown signal arrives
async fn run_daemon(config: Config) -> Result<()> {
    let registry = HandlerRegistry::new();

    #[cfg(feature = "ovh")]
    {
        info!("Registering OVHcloud handler");
        zonesync_provider_ovh::register(&registry);
    }

    let handler_config = config.handler_config();
    let metrics = Arc::new(PrometheusMetrics::new()?);
    let cache = Arc::new(MemoryZoneCache::new());
    let context = HandlerContext::new(
        zonesync_core::ratelimit::from_config(&handler_config.rate_limit),
        metrics.clone(),
        cache.clone(),
    );

    let handler = registry.create_handler(&handler_config, context)?;
    info!(
        "Handler {} ready (dry-run: {}, {} calls/s, burst {})",
        handler.provider_type(),
        handler_config.dry_run,
        handler_config.rate_limit.requests_per_second,
        handler_config.rate_limit.burst
    );

    let interval = Duration::from_secs(config.interval_secs);
    let max_age = chrono::Duration::seconds((config.interval_secs * u64::from(STATE_REFRESH_PASSES)) as i64);

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        let tick = async {
            if let Err(e) = inventory_pass(handler.as_ref(), &cache, max_age).await {
                error!("Inventory pass failed: {}", e);
            }
            match metrics.gather_text() {
                Ok(text) => debug!("Call counters:\n{}", text),
                Err(e) => warn!("Failed to gather metrics: {}", e),
            }
            tokio::time::sleep(interval).await;
        };

        // a pass in flight is abandoned on shutdown
        tokio::select! {
            signal = &mut shutdown => {
                let signal = signal?;
                info!("Received shutdown signal: {}", signal);
                info!("Shutting down daemon");
                return Ok(());
            }
            _ = tick => {}
        }
    }
}

/// List zones and read every zone state the cache does not hold fresh
async fn inventory_pass(
    handler: &dyn DnsHandler,
    cache: &MemoryZoneCache,
    max_age: chrono::Duration,
) -> zonesync_core::Result<()> {
    let zones = handler.get_zones().await?;

    let mut read = 0;
    for zone in &zones {
        if let Some(entry) = cache.get_entry(zone).await
            && !entry.is_stale(max_age)
        {
            continue;
        }

        match handler.get_zone_state(zone).await {
            Ok(state) => {
                info!(
                    "Zone {}: {} records in {} names ({} forwarded names)",
                    zone.id,
                    state.dnssets().record_count(),
                    state.dnssets().len(),
                    zone.forwarded_domains.len()
                );
                cache.store(zone, state).await;
                read += 1;
            }
            Err(e) => {
                warn!("Reading zone {} failed: {}", zone.id, e);
                cache.invalidate(zone).await;
            }
        }
    }

    info!(
        "Inventory pass done: {} zones, {} read, {} cached",
        zones.len(),
        read,
        cache.len().await
    );
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// The name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
