//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Share-split configuration.
    #[serde(default)]
    pub split: SplitConfig,
    /// Split memo cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Report binary configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Share-split configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitConfig {
    /// Decimal places portions are rounded to (0 = whole minor units).
    #[serde(default)]
    pub decimal_places: u32,
    /// Farmer share percentage applied to expenses whose category has neither
    /// an override nor a default.
    #[serde(default)]
    pub unconfigured_category_share: Decimal,
    /// Honour the share percentage recorded on a transaction at creation time
    /// instead of recomputing it from current settings.
    #[serde(default)]
    pub freeze_recorded_shares: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            decimal_places: 0,
            unconfigured_category_share: Decimal::ZERO,
            freeze_recorded_shares: false,
        }
    }
}

/// Split memo cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of memoised splits.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Time-to-live for each memoised split, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_ttl_secs() -> u64 {
    300 // 5 minutes
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "fieldshare=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Report binary configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Path of the JSON ledger snapshot to read.
    #[serde(default = "default_input_path")]
    pub input_path: String,
}

fn default_input_path() -> String {
    "ledger.json".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
        }
    }
}

/// Highest supported rounding precision.
const MAX_DECIMAL_PLACES: u32 = 6;

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FIELDSHARE").separator("__"))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks cross-field invariants the deserializer cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` describing the first violation.
    pub fn validate(&self) -> AppResult<()> {
        let share = self.split.unconfigured_category_share;
        if share < Decimal::ZERO || share > Decimal::ONE_HUNDRED {
            return Err(AppError::Configuration(format!(
                "split.unconfigured_category_share must be within 0..=100, got {share}"
            )));
        }
        if self.split.decimal_places > MAX_DECIMAL_PLACES {
            return Err(AppError::Configuration(format!(
                "split.decimal_places must be at most {MAX_DECIMAL_PLACES}, got {}",
                self.split.decimal_places
            )));
        }
        if self.cache.max_capacity == 0 {
            return Err(AppError::Configuration(
                "cache.max_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
