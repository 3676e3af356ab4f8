//! Configuration module for the Sales Analytics Service
//!
//! Sectioned configuration with per-section defaults, loaded from an
//! optional file plus `SALES_ANALYTICS__`-prefixed environment
//! variables.

use serde::{Deserialize, Serialize};

/// Main configuration for the Sales Analytics Service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Analytics computation configuration
    pub analytics: AnalyticsConfig,
    /// Logging configuration
    pub monitoring: MonitoringConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Enable CORS
    pub cors_enabled: bool,
}

/// Analytics computation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Number of entries in top-N rankings
    pub top_n: usize,
    /// Number of forecast steps appended to the monthly series
    pub forecast_steps: usize,
    /// Length of each comparison window for period-over-period change,
    /// in days
    pub period_days: i64,
    /// Maximum entries handed to the external insight generator
    pub insight_cap: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Log level
    pub log_level: String,
    /// Log format (json or text)
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_enabled: true,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            forecast_steps: 3,
            period_days: 3,
            insight_cap: 10,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, layered over an
    /// optional config file named by `SALES_ANALYTICS_CONFIG_FILE`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let mut cfg = config::Config::builder();

        if let Ok(config_file) = std::env::var("SALES_ANALYTICS_CONFIG_FILE") {
            cfg = cfg.add_source(config::File::with_name(&config_file));
        }

        cfg = cfg.add_source(
            config::Environment::with_prefix("SALES_ANALYTICS")
                .separator("__")
                .list_separator(","),
        );

        let config: Self = cfg.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.analytics.top_n == 0 {
            return Err("top_n must be greater than 0".to_string());
        }

        if self.analytics.period_days <= 0 {
            return Err("period_days must be greater than 0".to_string());
        }

        if self.analytics.insight_cap == 0 {
            return Err("insight_cap must be greater than 0".to_string());
        }

        Ok(())
    }
}
