use std::time::Duration;

use serde::Deserialize;

use crate::domain::route::KeyStrategy;
use crate::domain::DomainError;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::routing::ThrottlePolicy;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub routing: RoutingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Road routing provider and throttling settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Base URL of the OSRM server
    pub base_url: String,
    pub profile: String,
    /// `User-Agent` sent with every routing request
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Minimum spacing between consecutive provider calls
    pub min_interval_ms: u64,
    pub policy: ThrottlePolicy,
    pub key_strategy: KeyStrategy,
    /// Cache straight-line fallbacks produced by the queue policy
    pub cache_fallbacks: bool,
    /// Most stops accepted by one stops-path request
    pub max_stops: usize,
}

/// Route cache settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub max_capacity: u64,
    /// Interval of the expired-entry sweep; 0 disables it
    pub sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            user_agent: concat!("BusTrackerApp/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 10,
            min_interval_ms: 1000,
            policy: ThrottlePolicy::default(),
            key_strategy: KeyStrategy::default(),
            cache_fallbacks: true,
            max_stops: 25,
        }
    }
}

impl RoutingSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_capacity: 10_000,
            sweep_interval_secs: 60,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Rejects settings the service cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.routing.base_url.trim().is_empty() {
            return Err(DomainError::configuration("routing.base_url must not be empty"));
        }

        if self.routing.profile.trim().is_empty() {
            return Err(DomainError::configuration("routing.profile must not be empty"));
        }

        if self.routing.request_timeout_secs == 0 {
            return Err(DomainError::configuration(
                "routing.request_timeout_secs must be greater than 0",
            ));
        }

        if self.routing.max_stops < 2 {
            return Err(DomainError::configuration("routing.max_stops must be at least 2"));
        }

        if self.cache.ttl_secs == 0 {
            return Err(DomainError::configuration("cache.ttl_secs must be greater than 0"));
        }

        if self.cache.max_capacity == 0 {
            return Err(DomainError::configuration(
                "cache.max_capacity must be greater than 0",
            ));
        }

        Ok(())
    }
}
